//! Archive import.
//!
//! Pulls the captioned files of one document out of a zip archive into
//! `<status>/<doc_id>/`, then rebuilds the status page.
//!
//! ## What gets extracted
//!
//! Every archive entry ending in a caption suffix, plus every entry whose full
//! archive path starts with that caption's prefix:
//!
//! ```text
//! archive                           <status>/<doc_id>/
//! ├── sub/plot_caption.txt   →      ├── plot_caption.txt
//! ├── sub/plot.png           →      ├── plot.png
//! ├── sub/plot.pdf           →      └── plot.pdf
//! └── sub/notes.txt                 (no caption, left out)
//! ```
//!
//! Archive directories are flattened away: only the final path segment names
//! the extracted file (see [`archive_path_to_dest_name`]), and a later entry
//! with the same final segment overwrites an earlier one.
//!
//! ## Destination
//!
//! The destination is cleared first: regular files directly inside it are
//! deleted. Subdirectories and other document directories are left alone.

use crate::config::LinksConfig;
use crate::generate::{GenerateError, IndexBuilder, RebuildReport};
use crate::naming::{ConventionError, NamingConvention, archive_path_to_dest_name, normalize_label};
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Rebuild error: {0}")]
    Generate(#[from] GenerateError),
    #[error("Naming convention error: {0}")]
    Convention(#[from] ConventionError),
    #[error("Invalid {kind}: {value:?}")]
    InvalidLabel { kind: &'static str, value: String },
}

/// One archive entry selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full archive-internal path
    pub path: String,
    pub is_caption: bool,
    /// Caption prefix that selected this entry
    pub matched_prefix: Option<String>,
}

/// One write into the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub archive_path: String,
    pub name: String,
}

/// What an import produced.
#[derive(Debug)]
pub struct ImportReport {
    pub destination: PathBuf,
    /// Writes in extraction order; a name may be written more than once
    pub extracted: Vec<ExtractedFile>,
    pub rebuild: RebuildReport,
}

impl ImportReport {
    /// Destination names, each once, in order of first extraction.
    pub fn file_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for file in &self.extracted {
            if !names.contains(&file.name.as_str()) {
                names.push(&file.name);
            }
        }
        names
    }

    /// Whether `name` was written from more than one archive entry.
    pub fn is_overwritten(&self, name: &str) -> bool {
        let mut sources = self
            .extracted
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.archive_path.as_str());
        match sources.next() {
            Some(first) => sources.any(|p| p != first),
            None => false,
        }
    }
}

/// Source of document archives.
pub trait ArchiveSource {
    /// Fetch the zip archive for `doc_id`, positioned at its start.
    fn fetch(&self, doc_id: &str) -> Result<File, FetchError>;
}

/// Downloads archives from the document repository.
pub struct HttpArchiveSource {
    client: reqwest::blocking::Client,
    links: LinksConfig,
}

impl HttpArchiveSource {
    pub fn new(links: LinksConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self { client, links })
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn fetch(&self, doc_id: &str) -> Result<File, FetchError> {
        let url = self.links.retrieve_archive_url(doc_id);
        log::info!("Retrieving document {} from {}", doc_id, url);

        let http_err = |source| FetchError::Http {
            url: url.clone(),
            source,
        };
        let mut response = self.client.get(&url).send().map_err(http_err)?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }

        let mut file = tempfile::tempfile()?;
        let bytes = response.copy_to(&mut file).map_err(http_err)?;
        file.seek(SeekFrom::Start(0))?;
        log::info!("Retrieved document {} ({} bytes)", doc_id, bytes);
        Ok(file)
    }
}

/// Normalize a status or document id and check it names a plain relative path.
fn checked_label<'a>(kind: &'static str, value: &'a str) -> Result<&'a str, ImportError> {
    let label = normalize_label(value);
    let plain = !label.is_empty()
        && Path::new(label)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(label)
    } else {
        Err(ImportError::InvalidLabel {
            kind,
            value: value.to_string(),
        })
    }
}

/// Delete the regular files directly inside `dir`, creating it if absent.
///
/// Subdirectories are not entered. Returns the number of files removed.
pub fn clear_dir(dir: &Path) -> io::Result<usize> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Decide which archive entries to extract, in extraction order.
///
/// For each caption entry in archive order: the caption itself, then every
/// non-directory entry whose path starts with the caption's prefix. An entry
/// matched by several captions appears once per match.
pub fn plan_extraction(
    names: &[String],
    convention: &NamingConvention,
) -> Result<Vec<ArchiveEntry>, ConventionError> {
    let mut plan = Vec::new();
    for caption in names.iter().filter(|n| convention.is_caption_file(n)) {
        let prefix = convention.caption_prefix(caption)?;
        plan.push(ArchiveEntry {
            path: caption.clone(),
            is_caption: true,
            matched_prefix: Some(prefix.to_string()),
        });
        for name in names {
            if name.starts_with(prefix) && archive_path_to_dest_name(name).is_some() {
                plan.push(ArchiveEntry {
                    path: name.clone(),
                    is_caption: convention.is_caption_file(name),
                    matched_prefix: Some(prefix.to_string()),
                });
            }
        }
    }
    Ok(plan)
}

/// Import the captioned files of `doc_id` from `archive`, then rebuild.
pub fn import_archive<R: Read + Seek>(
    builder: &IndexBuilder<'_>,
    root: &Path,
    status: &str,
    doc_id: &str,
    archive: R,
) -> Result<ImportReport, ImportError> {
    let status = checked_label("status", status)?;
    let doc_id = checked_label("document id", doc_id)?;
    let destination = root.join(status).join(doc_id);

    let mut archive = ZipArchive::new(archive)?;
    let names = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    let plan = plan_extraction(&names, builder.convention())?;

    let removed = clear_dir(&destination)?;
    log::info!(
        "Cleared {} files from {}",
        removed,
        destination.display()
    );

    let mut extracted = Vec::with_capacity(plan.len());
    for entry in &plan {
        let Some(dest_name) = archive_path_to_dest_name(&entry.path) else {
            continue;
        };
        let mut source = archive.by_name(&entry.path)?;
        let mut out = File::create(destination.join(dest_name))?;
        io::copy(&mut source, &mut out)?;
        log::debug!("Extracted {} → {}", entry.path, dest_name);
        extracted.push(ExtractedFile {
            archive_path: entry.path.clone(),
            name: dest_name.to_string(),
        });
    }

    let rebuild = builder.rebuild(root, status)?;

    Ok(ImportReport {
        destination,
        extracted,
        rebuild,
    })
}

/// Fetch the archive for `doc_id` from `source`, then import it.
pub fn fetch_and_import(
    builder: &IndexBuilder<'_>,
    source: &dyn ArchiveSource,
    root: &Path,
    status: &str,
    doc_id: &str,
) -> Result<ImportReport, ImportError> {
    let doc = checked_label("document id", doc_id)?;
    let archive = source.fetch(doc)?;
    import_archive(builder, root, status, doc_id, archive)
}
