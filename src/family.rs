use crate::config::Config;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFamily {
    Presentation,
    Spreadsheet,
    WordProcessing,
}

impl DocumentFamily {
    /// Fixed batch order: presentations, then spreadsheets, then word-processing.
    pub const ALL: [DocumentFamily; 3] = [
        Self::Presentation,
        Self::Spreadsheet,
        Self::WordProcessing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Spreadsheet => "spreadsheet",
            Self::WordProcessing => "word-processing",
        }
    }

    /// Export constants of the automation interface: ppSaveAsPDF, xlTypePDF,
    /// wdFormatPDF.
    pub fn pdf_format_code(&self) -> u32 {
        match self {
            Self::Presentation => 32,
            Self::Spreadsheet => 0,
            Self::WordProcessing => 17,
        }
    }

    pub fn extensions<'c>(&self, cfg: &'c Config) -> &'c [String] {
        match self {
            Self::Presentation => &cfg.discovery.presentation_extensions,
            Self::Spreadsheet => &cfg.discovery.spreadsheet_extensions,
            Self::WordProcessing => &cfg.discovery.wordprocessing_extensions,
        }
    }
}
