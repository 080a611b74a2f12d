use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: Discovery,
    pub conversion: Conversion,
    pub engine: Engine,
    pub output: Output,
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Discovery {
    pub presentation_extensions: Vec<String>,
    pub spreadsheet_extensions: Vec<String>,
    pub wordprocessing_extensions: Vec<String>,
}
impl Default for Discovery {
    fn default() -> Self {
        Self {
            presentation_extensions: vec!["pptx".into(), "pptm".into(), "ppt".into()],
            spreadsheet_extensions: vec!["xlsx".into(), "xlsm".into(), "xls".into()],
            wordprocessing_extensions: vec!["docx".into(), "docm".into(), "doc".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversion {
    pub done_dir_name: String,
    pub progress_every: usize,
    pub overwrite_existing: bool,
}
impl Default for Conversion {
    fn default() -> Self {
        Self {
            done_dir_name: "done".into(),
            progress_every: 10,
            overwrite_existing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub host_exe: String,
    pub bridge_script: String,
    pub env: BTreeMap<String, String>,
    /// Engine error text is opaque and version-dependent; matching it for the
    /// password-protected classification is best effort only.
    pub password_error_patterns: Vec<String>,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            host_exe: "auto".into(),
            bridge_script: "scripts/automation_bridge.py".into(),
            env: Default::default(),
            password_error_patterns: vec!["(?i)password".into(), "(?i)protected".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub print_summary: bool,
    pub write_report_json: bool,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            print_summary: true,
            write_report_json: true,
            report_filename: "conversion-report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}
