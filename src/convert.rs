use crate::config::Config;
use crate::engine::{DocumentId, OpenOptions, Session, SheetInfo, SheetVisibility};
use crate::family::DocumentFamily;
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ConversionTarget {
    pub source: PathBuf,
    pub family: DocumentFamily,
    pub pdf: PathBuf,
}

impl ConversionTarget {
    /// The PDF lands next to the source unless an output directory is
    /// configured.
    pub fn resolve(source: &Path, family: DocumentFamily, output_dir: Option<&Path>) -> Self {
        let pdf = match output_dir {
            Some(dir) => {
                let mut name = source.file_stem().unwrap_or_default().to_os_string();
                name.push(".pdf");
                dir.join(name)
            }
            None => source.with_extension("pdf"),
        };
        Self {
            source: source.to_path_buf(),
            family,
            pdf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Skipped(String),
    Failed(String),
}

/// Convert a single target inside an open session. Never propagates engine
/// errors: everything is classified into an Outcome, and the document is
/// closed and released on every path so one bad file cannot abort the batch.
pub fn convert_one<S: Session>(cfg: &Config, session: &mut S, target: &ConversionTarget) -> Outcome {
    let doc = match session.open_document(&target.source, &open_options(target.family)) {
        Ok(doc) => doc,
        Err(err) => return Outcome::Failed(classify_error(cfg, &err)),
    };

    let exported = match target.family {
        DocumentFamily::Presentation | DocumentFamily::WordProcessing => {
            session.export_pdf(doc, &target.pdf, target.family.pdf_format_code())
        }
        DocumentFamily::Spreadsheet => export_workbook(session, doc, target),
    };

    // Close without saving: spreadsheet page-setup normalization must never be
    // written back to the source file.
    if let Err(err) = session.close_document(doc, false) {
        warn!("closing {} failed: {err:#}", target.source.display());
    }
    if let Err(err) = session.release_document(doc) {
        debug!("releasing {} failed: {err:#}", target.source.display());
    }

    match exported {
        Ok(()) => Outcome::Success,
        Err(err) => Outcome::Failed(classify_error(cfg, &err)),
    }
}

fn open_options(family: DocumentFamily) -> OpenOptions {
    match family {
        DocumentFamily::Presentation => OpenOptions {
            with_window: false,
            read_only: false,
            update_links: false,
            repair: false,
        },
        // Read-only with repair guards against malformed legacy workbooks.
        DocumentFamily::Spreadsheet => OpenOptions {
            with_window: false,
            read_only: true,
            update_links: false,
            repair: true,
        },
        DocumentFamily::WordProcessing => OpenOptions {
            with_window: false,
            read_only: false,
            update_links: false,
            repair: false,
        },
    }
}

/// Exporting the active sheet loses multi-sheet workbooks, so all visible
/// sheets are selected jointly and exported as one PDF. Hidden and very-hidden
/// sheets never participate.
fn export_workbook<S: Session>(
    session: &mut S,
    doc: DocumentId,
    target: &ConversionTarget,
) -> Result<()> {
    let sheets = session.sheet_info(doc)?;
    let visible: Vec<&SheetInfo> = sheets
        .iter()
        .filter(|s| s.visibility == SheetVisibility::Visible)
        .collect();
    if visible.is_empty() {
        anyhow::bail!("workbook has no visible sheets");
    }

    // A sheet with an explicit print area keeps it; the rest are scaled to one
    // page wide with unconstrained height so wide sheets stay legible.
    for sheet in visible.iter().filter(|s| !s.has_print_area) {
        session.fit_sheet_to_width(doc, &sheet.name)?;
    }

    let names: Vec<String> = visible.iter().map(|s| s.name.clone()).collect();
    session.select_sheets(doc, &names)?;
    session.export_pdf(doc, &target.pdf, target.family.pdf_format_code())
}

/// Collapse an engine error into an outcome reason. Password-protected files
/// are detected from the error text; the match is best effort because the
/// text is not stable across engine versions.
pub fn classify_error(cfg: &Config, err: &anyhow::Error) -> String {
    let text = format!("{err:#}");
    for pattern in &cfg.engine.password_error_patterns {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(&text) => {
                debug!("classified as password-protected: {text}");
                return "password-protected".to_string();
            }
            Ok(_) => {}
            Err(bad) => warn!("invalid password_error_patterns entry {pattern:?}: {bad}"),
        }
    }
    text
}
