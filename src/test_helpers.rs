//! Shared test utilities for the caption-index test suite.
//!
//! Provides fixture writers and bulk extractors that work with scan-phase
//! data structures (`Section`, `CaptionGroup`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_status_fixture();
//! let sections = scan_status(&tmp.path().join("under_review"), &convention).unwrap();
//!
//! assert_eq!(document_ids(&sections), vec!["1234", "9876"]);
//! assert_eq!(group_prefixes(&sections[1]), vec!["fig1", "fig2"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::Section;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `dir` (and parents) and write each `(name, contents)` pair into it.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
}

/// Owned file names, as a directory listing would produce them.
pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// A pages root holding an `under_review` status with two documents.
///
/// ```text
/// under_review/
/// ├── 1234/
/// │   ├── a_caption.txt      "Alpha <em>caption</em>"
/// │   └── a.gif
/// └── 9876/
///     ├── fig1_caption.txt   "Energy spectrum"
///     ├── fig1.pdf
///     ├── fig1.png
///     ├── fig2_caption.tex   "Resolution vs. $E$"
///     └── fig2.root
/// ```
pub fn setup_status_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let status = tmp.path().join("under_review");
    write_files(
        &status.join("1234"),
        &[("a_caption.txt", "Alpha <em>caption</em>"), ("a.gif", "gif")],
    );
    write_files(
        &status.join("9876"),
        &[
            ("fig1_caption.txt", "Energy spectrum"),
            ("fig1.pdf", "pdf"),
            ("fig1.png", "png"),
            ("fig2_caption.tex", "Resolution vs. $E$"),
            ("fig2.root", "root"),
        ],
    );
    tmp
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All document ids in page order.
pub fn document_ids(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.document_id.as_str()).collect()
}

/// Group prefixes of one section in page order.
pub fn group_prefixes(section: &Section) -> Vec<&str> {
    section.groups.iter().map(|g| g.prefix.as_str()).collect()
}

/// Drop the footer timestamp so two renders can be compared byte for byte.
pub fn strip_timestamp(html: &str) -> String {
    match html.find("Page last updated:") {
        Some(start) => {
            let end = html[start..].find("</p>").map(|e| start + e).unwrap_or(html.len());
            format!("{}{}", &html[..start], &html[end..])
        }
        None => html.to_string(),
    }
}
