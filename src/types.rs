//! Value types flowing from the scanner to the renderer.
//!
//! Everything here is rebuilt from the file system on every rebuild; nothing
//! is persisted or carries identity across runs.

use chrono::{DateTime, Local};

/// Files that share a caption file's prefix, rendered together as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionGroup {
    /// Shared file-name stem (`fig1` for `fig1_caption.txt`)
    pub prefix: String,
    /// Name of the caption file this group was built from
    pub caption_file: String,
    /// Directory holding the files, relative to the status root, `/`-separated
    pub rel_dir: String,
    /// Raw caption text, inserted into the page unescaped
    pub caption_text: String,
    /// Associated files, sorted; caption and thumbnail files excluded
    pub files: Vec<String>,
    /// File the thumbnail is generated from, if any image-like file exists
    pub thumbnail_source: Option<String>,
}

impl CaptionGroup {
    /// Link target of `name` relative to the status page.
    pub fn href(&self, name: &str) -> String {
        if self.rel_dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.rel_dir, name)
        }
    }
}

/// All groups belonging to one document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub document_id: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub groups: Vec<CaptionGroup>,
}

impl Section {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            title: None,
            authors: None,
            groups: Vec::new(),
        }
    }
}

/// A complete status page, ready to render.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: String,
    pub sections: Vec<Section>,
    pub generated_at: DateTime<Local>,
}

/// Title and authors scraped for a document id. Empty strings on a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMetadata {
    pub title: String,
    pub authors: String,
}
