//! CLI output formatting for rebuild and import.
//!
//! Output is **information-centric**: every caption group leads with its
//! positional index and prefix, with the caption file and thumbnail status
//! shown as indented context lines.
//!
//! # Output Format
//!
//! ## Rebuild
//!
//! ```text
//! under_review → under_review/index.html
//! 001 1234: Energy Reconstruction
//!     Authors: G. Horton-Smith
//!     001 a (1 file)
//!         Caption: a_caption.txt
//!         Thumbnail: a.gif
//! 002 9876
//!     001 fig1 (2 files)
//!         Caption: fig1_caption.txt
//!         Thumbnail: fig1.png (failed: convert exited with 1)
//!     002 fig2 (1 file)
//!         Caption: fig2_caption.tex
//!
//! Indexed 2 documents, 3 caption groups, 1 thumbnail failed
//! ```
//!
//! ## Import
//!
//! ```text
//! Imported 9876 → under_review/9876
//!     plot_caption.txt
//!     plot.png (overwritten)
//! ```
//!
//! followed by the rebuild output.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::RebuildReport;
use crate::imaging::ThumbnailOutcome;
use crate::import::ImportReport;
use crate::naming::NamingConvention;
use crate::types::{CaptionGroup, Section};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Section header: index, document id, and title when known.
fn section_header(index: usize, section: &Section) -> String {
    match section.title.as_deref() {
        Some(title) => format!("{} {}: {}", format_index(index), section.document_id, title),
        None => format!("{} {}", format_index(index), section.document_id),
    }
}

fn outcome_path(outcome: &ThumbnailOutcome) -> &Path {
    match outcome {
        ThumbnailOutcome::Created(path) => path,
        ThumbnailOutcome::ToolFailed { output, .. } => output,
    }
}

/// Find the outcome whose output is `rel_dir/thumb_name`.
fn find_outcome<'a>(
    outcomes: &'a [ThumbnailOutcome],
    rel_dir: &str,
    thumb_name: &str,
) -> Option<&'a ThumbnailOutcome> {
    let rel = Path::new(rel_dir).join(thumb_name);
    outcomes.iter().find(|o| outcome_path(o).ends_with(&rel))
}

fn thumbnail_line(
    group: &CaptionGroup,
    outcomes: &[ThumbnailOutcome],
    convention: &NamingConvention,
) -> Option<String> {
    let source = group.thumbnail_source.as_deref()?;
    let thumb_name = convention.thumbnail_name(source);
    let line = match find_outcome(outcomes, &group.rel_dir, &thumb_name) {
        Some(ThumbnailOutcome::ToolFailed { reason, .. }) => {
            format!("Thumbnail: {} (failed: {})", source, reason)
        }
        _ => format!("Thumbnail: {}", source),
    };
    Some(line)
}

// ============================================================================
// Rebuild output
// ============================================================================

/// Format the summary of a rebuilt status page.
pub fn format_rebuild_output(report: &RebuildReport, convention: &NamingConvention) -> Vec<String> {
    let page = &report.page;
    let mut lines = vec![format!("{} → {}", page.status, report.index_path.display())];

    for (i, section) in page.sections.iter().enumerate() {
        lines.push(section_header(i + 1, section));
        if let Some(authors) = section.authors.as_deref() {
            lines.push(format!("{}Authors: {}", indent(1), authors));
        }
        for (j, group) in section.groups.iter().enumerate() {
            lines.push(format!(
                "{}{} {} ({})",
                indent(1),
                format_index(j + 1),
                group.prefix,
                plural(group.files.len(), "file", "files")
            ));
            lines.push(format!("{}Caption: {}", indent(2), group.caption_file));
            if let Some(line) = thumbnail_line(group, &report.thumbnails, convention) {
                lines.push(format!("{}{}", indent(2), line));
            }
        }
    }

    let groups: usize = page.sections.iter().map(|s| s.groups.len()).sum();
    let failed = report.thumbnails.iter().filter(|o| !o.is_created()).count();
    let mut summary = format!(
        "Indexed {}, {}",
        plural(page.sections.len(), "document", "documents"),
        plural(groups, "caption group", "caption groups")
    );
    if failed > 0 {
        summary.push_str(&format!(", {} failed", plural(failed, "thumbnail", "thumbnails")));
    }
    lines.push(String::new());
    lines.push(summary);
    lines
}

pub fn print_rebuild_output(report: &RebuildReport, convention: &NamingConvention) {
    for line in format_rebuild_output(report, convention) {
        println!("{}", line);
    }
}

// ============================================================================
// Import output
// ============================================================================

/// Format the summary of an import, followed by its rebuild.
///
/// Each extracted name is listed once, at its first extraction. Names written
/// from more than one archive entry are marked as overwritten.
pub fn format_import_output(report: &ImportReport, doc_id: &str, convention: &NamingConvention) -> Vec<String> {
    let mut lines = vec![format!(
        "Imported {} → {}",
        doc_id,
        report.destination.display()
    )];

    for name in report.file_names() {
        if report.is_overwritten(name) {
            lines.push(format!("{}{} (overwritten)", indent(1), name));
        } else {
            lines.push(format!("{}{}", indent(1), name));
        }
    }
    if report.extracted.is_empty() {
        lines.push(format!("{}(no captioned files in archive)", indent(1)));
    }

    lines.push(String::new());
    lines.extend(format_rebuild_output(&report.rebuild, convention));
    lines
}

pub fn print_import_output(report: &ImportReport, doc_id: &str, convention: &NamingConvention) {
    for line in format_import_output(report, doc_id, convention) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ExtractedFile;
    use crate::types::Page;
    use chrono::Local;
    use std::path::PathBuf;

    fn group(rel_dir: &str, prefix: &str, files: &[&str], thumb: Option<&str>) -> CaptionGroup {
        CaptionGroup {
            prefix: prefix.to_string(),
            caption_file: format!("{}_caption.txt", prefix),
            rel_dir: rel_dir.to_string(),
            caption_text: String::new(),
            files: files.iter().map(|s| s.to_string()).collect(),
            thumbnail_source: thumb.map(str::to_string),
        }
    }

    fn report(sections: Vec<Section>, thumbnails: Vec<ThumbnailOutcome>) -> RebuildReport {
        RebuildReport {
            index_path: PathBuf::from("under_review/index.html"),
            page: Page {
                status: "under_review".to_string(),
                sections,
                generated_at: Local::now(),
            },
            thumbnails,
        }
    }

    fn sample_report() -> RebuildReport {
        let mut first = Section::new("1234");
        first.title = Some("Energy Reconstruction".to_string());
        first.authors = Some("G. Horton-Smith".to_string());
        first.groups.push(group("1234", "a", &["a.gif"], Some("a.gif")));
        let mut second = Section::new("9876");
        second
            .groups
            .push(group("9876", "fig1", &["fig1.pdf", "fig1.png"], Some("fig1.png")));
        second.groups.push(group("9876", "fig2", &["fig2.root"], None));

        report(
            vec![first, second],
            vec![
                ThumbnailOutcome::Created(PathBuf::from("/p/under_review/1234/a.gif_thumb.png")),
                ThumbnailOutcome::ToolFailed {
                    output: PathBuf::from("/p/under_review/9876/fig1.png_thumb.png"),
                    reason: "convert exited with 1".to_string(),
                },
            ],
        )
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_is_four_spaces_per_level() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn rebuild_output_lists_sections_and_groups() {
        let lines = format_rebuild_output(&sample_report(), &NamingConvention::default());
        assert_eq!(
            lines,
            vec![
                "under_review → under_review/index.html",
                "001 1234: Energy Reconstruction",
                "    Authors: G. Horton-Smith",
                "    001 a (1 file)",
                "        Caption: a_caption.txt",
                "        Thumbnail: a.gif",
                "002 9876",
                "    001 fig1 (2 files)",
                "        Caption: fig1_caption.txt",
                "        Thumbnail: fig1.png (failed: convert exited with 1)",
                "    002 fig2 (1 file)",
                "        Caption: fig2_caption.txt",
                "",
                "Indexed 2 documents, 3 caption groups, 1 thumbnail failed",
            ]
        );
    }

    #[test]
    fn empty_page_summary() {
        let lines = format_rebuild_output(&report(Vec::new(), Vec::new()), &NamingConvention::default());
        assert_eq!(lines.last().unwrap(), "Indexed 0 documents, 0 caption groups");
    }

    #[test]
    fn import_output_marks_overwritten_files() {
        let import = ImportReport {
            destination: PathBuf::from("approved/42"),
            extracted: [
                ("v1/fig_caption.txt", "fig_caption.txt"),
                ("v1/fig_caption.txt", "fig_caption.txt"),
                ("v1/fig.png", "fig.png"),
                ("v1/readme.txt", "readme.txt"),
                ("v2/fig.png", "fig.png"),
            ]
            .iter()
            .map(|(path, name)| ExtractedFile {
                archive_path: path.to_string(),
                name: name.to_string(),
            })
            .collect(),
            rebuild: report(Vec::new(), Vec::new()),
        };
        let lines = format_import_output(&import, "42", &NamingConvention::default());
        assert_eq!(lines[0], "Imported 42 → approved/42");
        assert_eq!(lines[1], "    fig_caption.txt");
        assert_eq!(lines[2], "    fig.png (overwritten)");
        assert_eq!(lines[3], "    readme.txt");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn import_output_without_captions() {
        let import = ImportReport {
            destination: PathBuf::from("s/1"),
            extracted: Vec::new(),
            rebuild: report(Vec::new(), Vec::new()),
        };
        let lines = format_import_output(&import, "1", &NamingConvention::default());
        assert_eq!(lines[1], "    (no captioned files in archive)");
    }
}
