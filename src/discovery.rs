use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Non-recursive scan for files whose extension is in `extensions`, sorted by
/// path for deterministic processing order. An empty result is not an error;
/// the pipeline treats it as a no-op and never launches the engine.
pub fn scan(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("reading folder: {}", folder.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| "reading folder entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // Office leaves ~$ lock files next to open documents.
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with("~$") {
                continue;
            }
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
