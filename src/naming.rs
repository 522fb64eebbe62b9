//! File-naming rules shared by import and render.
//!
//! The naming convention is the only contract between the importer (which
//! decides what lands on disk) and the page renderer (which decides how those
//! files group together), so both go through this module.
//!
//! ## Caption files
//!
//! A caption file ends in one of the caption suffixes (`_caption.txt`,
//! `_caption.tex`). Its *prefix* is the name with the suffix removed:
//!
//! - `fig1_caption.txt` → `fig1`
//! - `energy-spectrum_caption.tex` → `energy-spectrum`
//!
//! Every caption suffix must have the same length. Prefix extraction goes
//! through [`SuffixSet::strip_suffix`], and the set refuses to be built from
//! suffixes of unequal length.
//!
//! ## Associated files
//!
//! A file belongs to a caption's group when its name starts with `prefix.` or
//! with the prefix followed by a caption suffix's stem, the suffix up to and
//! including its last dot (`prefix_caption.` for the default suffixes). So
//! `fig1.png` and `fig1_caption.txt` belong to `fig1`, but `fig10.png` does
//! not. Generated thumbnails never belong to a group.
//!
//! ## Thumbnails
//!
//! Thumbnails are written next to their source as `source + "_thumb.png"`
//! (`fig1.png` → `fig1.png_thumb.png`). They are never grouped or linked.

use thiserror::Error;

/// Caption suffix for plain-text captions.
pub const CAPTION_TXT: &str = "_caption.txt";
/// Caption suffix for LaTeX captions.
pub const CAPTION_TEX: &str = "_caption.tex";
/// Suffix appended to a source image's file name to form its thumbnail name.
pub const THUMB_SUFFIX: &str = "_thumb.png";
/// Thumbnail source candidates, highest priority first.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "gif", "jpeg", "jpg", "eps", "pdf"];

const _: () = assert!(
    CAPTION_TXT.len() == CAPTION_TEX.len(),
    "caption suffixes must have equal length"
);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConventionError {
    #[error("Not a caption file: {0}")]
    NotACaptionFile(String),
    #[error("At least one caption suffix is required")]
    EmptySuffixSet,
    #[error("Caption suffixes must not be empty")]
    EmptySuffix,
    #[error("Caption suffixes must have equal length: {first:?} has {first_len}, {other:?} has {other_len}")]
    UnequalSuffixLengths {
        first: String,
        first_len: usize,
        other: String,
        other_len: usize,
    },
}

/// A validated set of caption suffixes, all of the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixSet {
    suffixes: Vec<String>,
}

impl SuffixSet {
    pub fn new<I, S>(suffixes: I) -> Result<Self, ConventionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suffixes: Vec<String> = suffixes.into_iter().map(Into::into).collect();
        let first = suffixes.first().ok_or(ConventionError::EmptySuffixSet)?;
        if first.is_empty() {
            return Err(ConventionError::EmptySuffix);
        }
        if let Some(other) = suffixes.iter().find(|s| s.len() != first.len()) {
            return Err(ConventionError::UnequalSuffixLengths {
                first: first.clone(),
                first_len: first.len(),
                other: other.clone(),
                other_len: other.len(),
            });
        }
        Ok(Self { suffixes })
    }

    /// The shared suffix length.
    pub fn suffix_len(&self) -> usize {
        self.suffixes[0].len()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    /// Remove whichever suffix `name` ends with.
    pub fn strip_suffix<'a>(&self, name: &'a str) -> Option<&'a str> {
        if self.matches(name) {
            Some(&name[..name.len() - self.suffix_len()])
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    /// Each suffix cut after its last dot: `_caption.txt` → `_caption.`.
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|s| match s.rfind('.') {
            Some(dot) => &s[..=dot],
            None => s,
        })
    }
}

impl Default for SuffixSet {
    fn default() -> Self {
        Self {
            suffixes: vec![CAPTION_TXT.to_string(), CAPTION_TEX.to_string()],
        }
    }
}

/// Caption, thumbnail, and association rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    captions: SuffixSet,
    thumb_suffix: String,
    image_extensions: Vec<String>,
}

impl NamingConvention {
    pub fn new(
        captions: SuffixSet,
        thumb_suffix: impl Into<String>,
        image_extensions: Vec<String>,
    ) -> Self {
        Self {
            captions,
            thumb_suffix: thumb_suffix.into(),
            image_extensions,
        }
    }

    pub fn captions(&self) -> &SuffixSet {
        &self.captions
    }

    pub fn thumb_suffix(&self) -> &str {
        &self.thumb_suffix
    }

    /// Thumbnail source extensions, highest priority first.
    pub fn image_extensions(&self) -> &[String] {
        &self.image_extensions
    }

    pub fn is_caption_file(&self, name: &str) -> bool {
        self.captions.matches(name)
    }

    pub fn caption_prefix<'a>(&self, name: &'a str) -> Result<&'a str, ConventionError> {
        self.captions
            .strip_suffix(name)
            .ok_or_else(|| ConventionError::NotACaptionFile(name.to_string()))
    }

    pub fn is_thumbnail(&self, name: &str) -> bool {
        name.ends_with(self.thumb_suffix.as_str())
    }

    pub fn is_associated_file(&self, name: &str, prefix: &str) -> bool {
        let belongs = name.strip_prefix(prefix).is_some_and(|rest| {
            rest.starts_with('.') || self.captions.stems().any(|stem| rest.starts_with(stem))
        });
        belongs && !self.is_thumbnail(name)
    }

    /// File name of the thumbnail generated from `source`.
    pub fn thumbnail_name(&self, source: &str) -> String {
        format!("{}{}", source, self.thumb_suffix)
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            captions: SuffixSet::default(),
            thumb_suffix: THUMB_SUFFIX.to_string(),
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Map an archive entry path to the file name it is extracted as.
///
/// Only the final path segment survives: `sub/plot.png` → `plot.png`. Two
/// entries with the same final segment map to the same name, and whichever is
/// extracted last wins. Directory entries, and segments that would name the
/// destination or its parent (`.`, `..`), map to `None`.
pub fn archive_path_to_dest_name(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// Trim whitespace and slashes from both ends of a status or document id.
///
/// `" under_review/ "` → `"under_review"`.
pub fn normalize_label(label: &str) -> &str {
    label.trim_matches(|c: char| c.is_whitespace() || c == '/')
}
