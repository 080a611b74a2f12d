pub mod bridge;
pub mod types;

use anyhow::Result;
use std::path::Path;

use crate::family::DocumentFamily;

pub use types::{DocumentId, OpenOptions, SheetInfo, SheetVisibility};

pub trait Engine {
    type Session: Session;

    /// Launch one automation-engine instance for the given family, configured
    /// for unattended operation. Failure aborts only that family's pipeline.
    fn launch(&self, family: DocumentFamily) -> Result<Self::Session>;
}

pub trait Session {
    fn open_document(&mut self, path: &Path, opts: &OpenOptions) -> Result<DocumentId>;
    fn sheet_info(&mut self, doc: DocumentId) -> Result<Vec<SheetInfo>>;
    /// Normalize a sheet's page setup to one page wide, unconstrained height.
    fn fit_sheet_to_width(&mut self, doc: DocumentId, sheet: &str) -> Result<()>;
    fn select_sheets(&mut self, doc: DocumentId, sheets: &[String]) -> Result<()>;
    fn export_pdf(&mut self, doc: DocumentId, pdf: &Path, format_code: u32) -> Result<()>;
    fn close_document(&mut self, doc: DocumentId, save_changes: bool) -> Result<()>;
    /// Drop the engine's reference to the document and trigger collection so
    /// native handles do not pile up across a long batch.
    fn release_document(&mut self, doc: DocumentId) -> Result<()>;
    /// Idempotent. Quitting an already-broken engine must not raise; failures
    /// are logged and swallowed.
    fn quit(&mut self);
}
