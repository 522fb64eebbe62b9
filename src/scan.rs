//! Status directory scanning.
//!
//! Walks a status root and turns every directory holding caption files into
//! caption groups, collected into one [`Section`] per document id.
//!
//! ## Directory Structure
//!
//! ```text
//! under_review/                  # Status root (page root)
//! ├── index.html                 # Generated page (not scanned for groups)
//! ├── 9876/                      # Document id → section "9876"
//! │   ├── fig1_caption.txt
//! │   ├── fig1.png
//! │   └── fig1.pdf
//! └── 9901/
//!     ├── a_caption.txt
//!     └── extra/                 # Nested: still section "9901"
//!         └── b_caption.tex
//! ```
//!
//! ## Ordering
//!
//! Directories are visited in lexicographic order of their path relative to
//! the root, so the page does not depend on file system listing order.
//! Groups from several directories under the same document id accumulate into
//! one section in visit order; sections appear in order of first visit.
//! Sections without groups are left out.

use crate::group::build_groups;
use crate::naming::{ConventionError, NamingConvention};
use crate::types::Section;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Cannot read caption file {path}: {source}")]
    MissingCaptionFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Naming convention error: {0}")]
    Convention(#[from] ConventionError),
}

/// Scan the status root at `root` into sections.
pub fn scan_status(root: &Path, convention: &NamingConvention) -> Result<Vec<Section>, ScanError> {
    // Surface a missing root as an IO error rather than an empty page
    fs::metadata(root)?;

    let mut dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            let rel = relative_path(root, entry.path());
            dirs.push((rel, entry.into_path()));
        }
    }
    dirs.sort();

    warn_on_root_captions(root, convention)?;

    let mut sections: Vec<Section> = Vec::new();
    for (rel_dir, path) in &dirs {
        let names = list_file_names(path)?;
        let groups = build_groups(path, rel_dir, &names, convention)?;
        if groups.is_empty() {
            continue;
        }

        let document_id = rel_dir.split('/').next().unwrap_or(rel_dir);
        log::debug!("{}: {} caption groups", rel_dir, groups.len());

        match sections.iter_mut().find(|s| s.document_id == document_id) {
            Some(section) => section.groups.extend(groups),
            None => {
                let mut section = Section::new(document_id);
                section.groups = groups;
                sections.push(section);
            }
        }
    }

    Ok(sections)
}

/// `/`-joined path of `path` below `root`.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Names of the regular files directly inside `dir`, sorted.
///
/// Names that are not valid UTF-8 cannot be matched or linked and are skipped.
fn list_file_names(dir: &Path) -> Result<Vec<String>, ScanError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!(
                "Skipping {:?} in {}: file name is not valid UTF-8",
                raw,
                dir.display()
            ),
        }
    }
    names.sort();
    Ok(names)
}

/// Caption files directly in the status root have no document id to file
/// them under, so they are skipped.
fn warn_on_root_captions(root: &Path, convention: &NamingConvention) -> Result<(), ScanError> {
    for name in list_file_names(root)? {
        if convention.is_caption_file(&name) {
            log::warn!(
                "Skipping {} in {}: caption files must live in a document directory",
                name,
                root.display()
            );
        }
    }
    Ok(())
}
