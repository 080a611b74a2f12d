use crate::config::Config;
use crate::convert::{ConversionTarget, Outcome, convert_one};
use crate::discovery;
use crate::engine::{Engine, Session};
use crate::family::DocumentFamily;
use crate::report::{FamilyReport, Stats};
use crate::util::move_file;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct Pipeline<E: Engine> {
    cfg: Config,
    engine: E,
}

impl<E: Engine> Pipeline<E> {
    pub fn new(cfg: &Config, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            engine,
        }
    }

    /// Run one family to completion: discover, launch, convert each file,
    /// quit. Per-file errors are absorbed into outcomes; only discovery and
    /// launch failures abort the family, and neither aborts the batch.
    pub fn run_family(
        &self,
        family: DocumentFamily,
        input: &Path,
        output: Option<&Path>,
    ) -> FamilyReport {
        let files = match discovery::scan(input, family.extensions(&self.cfg)) {
            Ok(files) => files,
            Err(err) => {
                warn!("discovery failed for {}: {err:#}", family.label());
                return FamilyReport::aborted(family, 0, format!("{err:#}"));
            }
        };

        if files.is_empty() {
            info!("no {} files found", family.label());
            return FamilyReport::empty(family);
        }

        info!("{}: {} file(s) to convert", family.label(), files.len());

        let mut session = match self.engine.launch(family) {
            Ok(session) => session,
            Err(err) => {
                warn!("engine launch failed for {}: {err:#}", family.label());
                return FamilyReport::aborted(family, files.len(), format!("{err:#}"));
            }
        };

        // run_files classifies every per-file error into an outcome, so the
        // quit below runs on every path once the loop finishes.
        let stats = self.run_files(&mut session, family, &files, input, output);
        session.quit();

        FamilyReport::completed(family, files.len(), stats)
    }

    fn run_files(
        &self,
        session: &mut E::Session,
        family: DocumentFamily,
        files: &[PathBuf],
        input: &Path,
        output: Option<&Path>,
    ) -> Stats {
        let mut stats = Stats::default();
        let done_dir = input.join(&self.cfg.conversion.done_dir_name);

        for (i, file) in files.iter().enumerate() {
            let target = ConversionTarget::resolve(file, family, output);
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<non-utf8 name>");

            let outcome = if !self.cfg.conversion.overwrite_existing && target.pdf.exists() {
                // Idempotence for re-runs: never touch the engine for work
                // that is already done.
                Outcome::Skipped("already exists".to_string())
            } else {
                convert_one(&self.cfg, session, &target)
            };

            match &outcome {
                Outcome::Success => {
                    stats.success += 1;
                    info!("[ok] {name}");
                    if let Err(err) = relocate_to_done(&done_dir, file) {
                        // The PDF was produced; only the housekeeping move failed.
                        warn!("could not move {name} to {}: {err:#}", done_dir.display());
                    }
                }
                Outcome::Skipped(reason) => {
                    stats.skipped += 1;
                    info!("[skip] {name}: {reason}");
                }
                Outcome::Failed(reason) => {
                    stats.failed += 1;
                    warn!("[fail] {name}: {reason}");
                }
            }

            let processed = i + 1;
            if self.cfg.conversion.progress_every > 0
                && processed % self.cfg.conversion.progress_every == 0
            {
                info!("{}: {processed}/{} processed", family.label(), files.len());
            }
        }

        stats
    }
}

fn relocate_to_done(done_dir: &Path, source: &Path) -> Result<()> {
    std::fs::create_dir_all(done_dir)
        .with_context(|| format!("create_dir_all {}", done_dir.display()))?;
    let Some(name) = source.file_name() else {
        anyhow::bail!("source has no file name: {}", source.display());
    };
    let dest = done_dir.join(name);
    // A stale entry from an earlier run is replaced, never merged around.
    if dest.exists() {
        std::fs::remove_file(&dest)
            .with_context(|| format!("removing stale {}", dest.display()))?;
    }
    move_file(source, &dest)
}
