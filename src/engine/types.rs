use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub with_window: bool,
    pub read_only: bool,
    pub update_links: bool,
    pub repair: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetVisibility {
    Visible,
    Hidden,
    VeryHidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetInfo {
    pub name: String,
    pub visibility: SheetVisibility,
    pub has_print_area: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchOut {
    pub ok: bool,
    #[serde(default)]
    pub engine_version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenOut {
    pub ok: bool,
    #[serde(default)]
    pub doc_id: u64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsOut {
    pub ok: bool,
    #[serde(default)]
    pub sheets: Vec<SheetInfo>,
    #[serde(default)]
    pub error: Option<String>,
}
