use crate::{
    config::Config,
    engine::bridge::BridgeEngine,
    orchestrator,
    report::BatchReport,
    util::{ensure_dir, log_file_name},
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const INPUT_FOLDER_ENV: &str = "INPUT_FOLDER";
const OUTPUT_FOLDER_ENV: &str = "OUTPUT_FOLDER";

#[derive(Parser, Debug)]
#[command(name = "pdfsweep")]
#[command(about = "Batch-convert office documents in a folder to PDF via the desktop office suite")]
pub struct Args {
    /// Folder containing the documents to convert. Falls back to $INPUT_FOLDER.
    pub folder: Option<PathBuf>,

    /// Folder for the produced PDFs. Falls back to $OUTPUT_FOLDER, then to the
    /// source folder.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Path to config TOML. If omitted, uses ./pdfsweep.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = resolve_config(args.config.as_deref())?;

    let input = resolve_input_folder(&args)?;
    let output = resolve_output_folder(&args);
    if let Some(out) = output.as_deref() {
        ensure_dir(out)?;
    }

    let log_path = resolve_log_path(&cfg, &input, output.as_deref());
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    info!("input folder: {}", input.display());
    if let Some(out) = output.as_deref() {
        info!("output folder: {}", out.display());
    }

    let engine = BridgeEngine::new(&cfg);
    let report = orchestrator::run_batch(&cfg, engine, &input, output.as_deref());

    finish(&cfg, &input, output.as_deref(), &report)
}

fn resolve_config(user: Option<&Path>) -> Result<Config> {
    if let Some(p) = user {
        return Config::load(p);
    }
    let default = Path::new("pdfsweep.toml");
    if default.exists() {
        Config::load(default)
    } else {
        Ok(Config::default())
    }
}

fn resolve_input_folder(args: &Args) -> Result<PathBuf> {
    let folder = args
        .folder
        .clone()
        .or_else(|| env_path(INPUT_FOLDER_ENV))
        .ok_or_else(|| {
            anyhow!("no input folder: pass one as an argument or set ${INPUT_FOLDER_ENV}")
        })?;

    if !folder.is_dir() {
        return Err(anyhow!("input folder does not exist: {}", folder.display()));
    }
    Ok(folder)
}

fn resolve_output_folder(args: &Args) -> Option<PathBuf> {
    args.output.clone().or_else(|| env_path(OUTPUT_FOLDER_ENV))
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config, input: &Path, output: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(output.unwrap_or(input).join(log_file_name()))
}

fn finish(cfg: &Config, input: &Path, output: Option<&Path>, report: &BatchReport) -> Result<()> {
    for family in &report.families {
        match &family.error {
            Some(err) => info!("{}: aborted: {err}", family.family.label()),
            None => info!(
                "{}: {} discovered, success={} skipped={} failed={}",
                family.family.label(),
                family.discovered,
                family.stats.success,
                family.stats.skipped,
                family.stats.failed
            ),
        }
    }
    info!("summary {}", report.summary_line());

    // Failures below are housekeeping; the batch itself already completed.
    if cfg.output.write_report_json {
        let path = output.unwrap_or(input).join(&cfg.output.report_filename);
        match serde_json::to_string_pretty(report) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&path, json) {
                    warn!("could not write report {}: {err}", path.display());
                }
            }
            Err(err) => warn!("could not serialize report: {err}"),
        }
    }

    if cfg.output.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "totals": report.totals,
                "status": "done",
            }))?
        );
    }

    Ok(())
}
