use anyhow::Result;
use clap::Parser;
use pdfsweep::cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        // Logging may not be initialized yet when configuration fails early.
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
