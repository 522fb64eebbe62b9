//! Caption group construction for a single directory.
//!
//! Given the flat list of file names in one directory, every caption file
//! becomes one [`CaptionGroup`]. Caption files are handled in file-name order,
//! so the result does not depend on the order the file system lists them in.
//!
//! ```text
//! under_review/9876/
//! ├── fig1_caption.txt     → group "fig1", caption "Energy spectrum"
//! ├── fig1.pdf             →   file
//! ├── fig1.png             →   file, thumbnail source
//! ├── fig1.png_thumb.png   →   (generated, ignored)
//! └── notes.txt            → (no caption, ignored)
//! ```

use crate::imaging::select_thumbnail_source;
use crate::naming::NamingConvention;
use crate::scan::ScanError;
use crate::types::CaptionGroup;
use std::fs;
use std::path::Path;

/// Build the caption groups for directory `dir`.
///
/// `rel_dir` is `dir` relative to the status root and ends up in link targets.
/// A directory without caption files yields no groups.
pub fn build_groups(
    dir: &Path,
    rel_dir: &str,
    names: &[String],
    convention: &NamingConvention,
) -> Result<Vec<CaptionGroup>, ScanError> {
    let mut captions: Vec<&String> = names
        .iter()
        .filter(|n| convention.is_caption_file(n))
        .collect();
    captions.sort();

    let mut groups = Vec::with_capacity(captions.len());
    for caption in captions {
        let prefix = convention.caption_prefix(caption)?;

        let mut files: Vec<String> = names
            .iter()
            .filter(|n| convention.is_associated_file(n, prefix) && !convention.is_caption_file(n))
            .cloned()
            .collect();
        files.sort();

        let caption_path = dir.join(caption);
        let bytes = fs::read(&caption_path).map_err(|source| ScanError::MissingCaptionFile {
            path: caption_path.clone(),
            source,
        })?;
        // Captions are raw text in whatever encoding the author used
        let caption_text = String::from_utf8_lossy(&bytes).into_owned();

        let thumbnail_source =
            select_thumbnail_source(prefix, &files, convention.image_extensions());

        log::debug!(
            "group {} in {}: {} files, thumbnail {:?}",
            prefix,
            dir.display(),
            files.len(),
            thumbnail_source
        );

        groups.push(CaptionGroup {
            prefix: prefix.to_string(),
            caption_file: caption.clone(),
            rel_dir: rel_dir.to_string(),
            caption_text,
            files,
            thumbnail_source,
        });
    }

    Ok(groups)
}
