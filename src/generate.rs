//! Index page generation.
//!
//! Rebuilding a status page runs the whole pipeline from scratch:
//!
//! ```text
//! scan <status>/  →  thumbnails  →  metadata  →  render (maud)  →  <status>/index.html
//! ```
//!
//! ## Page Layout
//!
//! ```text
//! <h1>Index of under_review plots and other data representations</h1>
//! <hr/> <a href=ShowDocument?docid=9876><h2>9876: Title</h2></a>
//!       <div> <h3>fig1</h3>
//!             [thumbnail block]  fig1.pdf  fig1.png
//!             <p>caption text, verbatim</p>
//!       </div>
//! <hr/> <p>Page last updated: Fri Oct 16 09:05:03 2026</p>
//! ```
//!
//! Caption text is trusted markup and inserted without escaping. Everything
//! else (file names, document ids, scraped titles) goes through maud's
//! escaping.
//!
//! ## Publishing
//!
//! The page is written to a temporary file next to the target and renamed
//! into place, so a reader never sees a half-written page and a failed
//! rebuild leaves the previous page untouched.

use crate::config::{LinksConfig, PageConfig, PageLayoutConfig};
use crate::imaging::{ImageThumbnailer, ThumbnailFailurePolicy, ThumbnailOutcome};
use crate::metadata::DocMetadataLookup;
use crate::naming::{ConventionError, NamingConvention, normalize_label};
use crate::scan::{ScanError, scan_status};
use crate::types::{CaptionGroup, Page, Section};
use chrono::{DateTime, Local};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Thumbnail for {path} failed: {reason}")]
    Thumbnail { path: PathBuf, reason: String },
    #[error("Could not publish page: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Invalid status label: {0:?}")]
    InvalidStatus(String),
}

/// `ctime`-style timestamp, e.g. `Fri Oct 16 09:05:03 2026`.
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

const FLOATBOX_CSS: &str =
    "div.FLOATBOX { border: double #7700bb; margin: 1pt; padding: 2pt; float: left; }";

/// What a rebuild produced.
#[derive(Debug)]
pub struct RebuildReport {
    pub index_path: PathBuf,
    pub page: Page,
    pub thumbnails: Vec<ThumbnailOutcome>,
}

/// Everything a rebuild needs, passed in explicitly.
pub struct IndexBuilder<'a> {
    convention: NamingConvention,
    links: LinksConfig,
    layout: PageLayoutConfig,
    on_failure: ThumbnailFailurePolicy,
    thumbnailer: &'a dyn ImageThumbnailer,
    metadata: Option<&'a dyn DocMetadataLookup>,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(
        config: &PageConfig,
        thumbnailer: &'a dyn ImageThumbnailer,
    ) -> Result<Self, ConventionError> {
        Ok(Self {
            convention: config.naming.convention()?,
            links: config.links.clone(),
            layout: config.page.clone(),
            on_failure: config.thumbnails.on_failure,
            thumbnailer,
            metadata: None,
        })
    }

    pub fn with_metadata(mut self, lookup: &'a dyn DocMetadataLookup) -> Self {
        self.metadata = Some(lookup);
        self
    }

    pub fn convention(&self) -> &NamingConvention {
        &self.convention
    }

    /// Re-scan `root/status` and rewrite its index page.
    pub fn rebuild(&self, root: &Path, status: &str) -> Result<RebuildReport, GenerateError> {
        let label = status;
        let status = normalize_label(label);
        if status.is_empty() {
            return Err(GenerateError::InvalidStatus(label.to_string()));
        }
        let status_dir = root.join(status);

        log::info!("Scanning {}", status_dir.display());
        let mut sections = scan_status(&status_dir, &self.convention)?;

        let thumbnails = self.make_thumbnails(&status_dir, &sections)?;

        if let Some(lookup) = self.metadata {
            for section in &mut sections {
                let meta = lookup.lookup(&section.document_id);
                section.title = Some(meta.title).filter(|t| !t.is_empty());
                section.authors = Some(meta.authors).filter(|a| !a.is_empty());
            }
        }

        let page = Page {
            status: status.to_string(),
            sections,
            generated_at: Local::now(),
        };
        let markup = render_page(&page, &self.links, &self.layout, &self.convention);

        let index_path = status_dir.join(&self.layout.index_file);
        write_page(&index_path, &markup.into_string())?;
        log::info!("Wrote {}", index_path.display());

        Ok(RebuildReport {
            index_path,
            page,
            thumbnails,
        })
    }

    fn make_thumbnails(
        &self,
        status_dir: &Path,
        sections: &[Section],
    ) -> Result<Vec<ThumbnailOutcome>, GenerateError> {
        let mut outcomes = Vec::new();
        for group in sections.iter().flat_map(|s| &s.groups) {
            let Some(source) = &group.thumbnail_source else {
                continue;
            };
            let dir = status_dir.join(&group.rel_dir);
            let source_path = dir.join(source);
            let output = dir.join(self.convention.thumbnail_name(source));

            let outcome = self.thumbnailer.thumbnail(&source_path, &output);
            if let ThumbnailOutcome::ToolFailed { reason, .. } = &outcome {
                match self.on_failure {
                    ThumbnailFailurePolicy::Ignore => {
                        log::debug!("Thumbnail for {} failed: {}", source_path.display(), reason)
                    }
                    ThumbnailFailurePolicy::Warn => {
                        log::warn!("Thumbnail for {} failed: {}", source_path.display(), reason)
                    }
                    ThumbnailFailurePolicy::Fail => {
                        return Err(GenerateError::Thumbnail {
                            path: source_path,
                            reason: reason.clone(),
                        });
                    }
                }
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

/// Write `html` to `path` through a temporary file and an atomic rename.
pub fn write_page(path: &Path, html: &str) -> Result<(), GenerateError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(html.as_bytes())?;
    tmp.flush()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(path)?;
    Ok(())
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(CTIME_FORMAT).to_string()
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the complete status page.
pub fn render_page(
    page: &Page,
    links: &LinksConfig,
    layout: &PageLayoutConfig,
    convention: &NamingConvention,
) -> Markup {
    let title = format!(
        "Index of {} plots and other data representations",
        page.status
    );

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (title) }
                link rel="stylesheet" href=(layout.stylesheet) type="text/css" media="screen, projection";
                style { (PreEscaped(FLOATBOX_CSS)) }
            }
            body {
                h1 { (title) }
                @for section in &page.sections {
                    (render_section(section, links, convention))
                }
                hr;
                p { "Page last updated: " (format_timestamp(&page.generated_at)) }
            }
        }
    }
}

/// Renders one document's heading and its groups.
fn render_section(section: &Section, links: &LinksConfig, convention: &NamingConvention) -> Markup {
    html! {
        hr;
        a href=(links.show_document_url(&section.document_id)) {
            h2 {
                (section.document_id)
                @if let Some(title) = &section.title {
                    ": " (title)
                }
            }
        }
        @if let Some(authors) = &section.authors {
            p.authors { (authors) }
        }
        @for group in &section.groups {
            (render_group(group, convention))
        }
    }
}

/// Renders a caption group: thumbnail, file links, caption.
fn render_group(group: &CaptionGroup, convention: &NamingConvention) -> Markup {
    html! {
        div.group {
            h3 { (group.prefix) }
            @if let Some(source) = &group.thumbnail_source {
                a href=(group.href(source)) {
                    div.FLOATBOX {
                        img src=(group.href(&convention.thumbnail_name(source))) alt=(source);
                        br;
                        (source)
                    }
                }
                " "
            }
            @for file in &group.files {
                a href=(group.href(file)) { (file) }
                " "
            }
            br clear="all";
            p.caption { (PreEscaped(&group.caption_text)) }
        }
    }
}
