use crate::config::Config;
use crate::engine::Engine;
use crate::family::DocumentFamily;
use crate::pipeline::Pipeline;
use crate::report::BatchReport;
use crate::util::now_rfc3339;
use std::path::Path;
use tracing::info;

/// Run the three family pipelines in fixed order and merge their statistics.
/// A launch failure in one family never prevents the others from running.
pub fn run_batch<E: Engine>(
    cfg: &Config,
    engine: E,
    input: &Path,
    output: Option<&Path>,
) -> BatchReport {
    let started = now_rfc3339();
    let pipeline = Pipeline::new(cfg, engine);
    let mut families = Vec::with_capacity(DocumentFamily::ALL.len());

    for family in DocumentFamily::ALL {
        info!("--- {} ---", family.label());
        families.push(pipeline.run_family(family, input, output));
    }

    BatchReport::new(families, started, now_rfc3339())
}
