//! # Caption Index
//!
//! Builds a static HTML index of captioned plots, grouped per document.
//! The filesystem is the data source: every `*_caption.txt` / `*_caption.tex`
//! file under a status directory starts a caption group, and the files sharing
//! its prefix are linked from that group.
//!
//! # Pipeline
//!
//! ```text
//! [import]   archive.zip  →  <status>/<doc_id>/      (optional)
//! scan       <status>/    →  sections of caption groups
//! thumbnail  one image per group → <image>_thumb.png
//! generate   sections     →  <status>/index.html     (atomic rename)
//! ```
//!
//! Every rebuild re-scans from scratch. Nothing is cached between runs, so the
//! page is always a function of what is on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Caption, thumbnail, and archive naming rules shared by import and render |
//! | [`group`] | Builds caption groups from one directory listing |
//! | [`scan`] | Walks a status directory into per-document sections |
//! | [`imaging`] | Thumbnail source selection and the thumbnailer backends |
//! | [`metadata`] | Document title/author lookup from the document repository |
//! | [`generate`] | Renders and atomically publishes the index page using Maud |
//! | [`import`] | Fetches and extracts document archives, then rebuilds |
//! | [`config`] | `caption-index.toml` loading, validation, and stock defaults |
//! | [`types`] | Value types passed from scan to render |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Context
//!
//! Suffixes, link templates, and thumbnail settings live in
//! [`config::PageConfig`] and reach the pipeline through
//! [`generate::IndexBuilder`]. No module reads configuration on its own.
//!
//! ## Pluggable Thumbnailing
//!
//! Thumbnails come from an [`imaging::ImageThumbnailer`]. The default runs
//! ImageMagick's `convert` (which also rasterizes pdf and eps); the builtin
//! backend uses the `image` crate and needs no system tools. Whether a failed
//! thumbnail matters is decided by [`imaging::ThumbnailFailurePolicy`], not by
//! the backend.
//!
//! ## Atomic Publishing
//!
//! The page is written to a temporary file in the status directory and renamed
//! over `index.html`. A failed rebuild leaves the previous page in place.

pub mod config;
pub mod generate;
pub mod group;
pub mod imaging;
pub mod import;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
