//! Page configuration.
//!
//! Loaded from an optional `caption-index.toml` in the pages root (the
//! directory holding the status directories). Every value has a default, so
//! the file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [naming]
//! caption_suffixes = ["_caption.txt", "_caption.tex"]  # must all have equal length
//! thumbnail_suffix = "_thumb.png"
//! image_extensions = ["png", "gif", "jpeg", "jpg", "eps", "pdf"]  # priority order
//!
//! [links]
//! show_document = "http://microboone-docdb.fnal.gov:8080/cgi-bin/ShowDocument?docid={docid}"
//! retrieve_archive = "http://microboone-docdb.fnal.gov:8080/cgi-bin/RetrieveArchive?docid={docid}&type=zip"
//!
//! [thumbnails]
//! backend = "convert"     # "convert" (ImageMagick) or "builtin"
//! command = "convert"
//! size = 128
//! on_failure = "ignore"   # "ignore", "warn" or "fail"
//!
//! [metadata]
//! enabled = true
//! title_pattern = '(?s)<div id="DocTitle">\s*<h1>(.*?)</h1>'
//! authors_pattern = '(?s)<div id="Authors">.*?<ul>(.*?)</ul>'
//!
//! [page]
//! index_file = "index.html"
//! stylesheet = "ubplot.css"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ThumbnailFailurePolicy;
use crate::naming::{
    CAPTION_TEX, CAPTION_TXT, ConventionError, IMAGE_EXTENSIONS, NamingConvention, SuffixSet,
    THUMB_SUFFIX,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the config file inside the pages root.
pub const CONFIG_FILE: &str = "caption-index.toml";

/// Placeholder substituted with the document id in URL templates.
pub const DOCID_PLACEHOLDER: &str = "{docid}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Naming convention error: {0}")]
    Convention(#[from] ConventionError),
}

/// Configuration loaded from `caption-index.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Caption, thumbnail, and image-priority naming rules.
    pub naming: NamingConfig,
    /// URL templates for the document repository.
    pub links: LinksConfig,
    /// Thumbnail generation.
    pub thumbnails: ThumbnailsConfig,
    /// Remote title/author lookup.
    pub metadata: MetadataConfig,
    /// Generated page layout.
    pub page: PageLayoutConfig,
}

impl PageConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.naming.convention()?;
        if self.naming.thumbnail_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "naming.thumbnail_suffix must not be empty".into(),
            ));
        }
        if self.naming.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "naming.image_extensions must not be empty".into(),
            ));
        }
        for (key, template) in [
            ("links.show_document", &self.links.show_document),
            ("links.retrieve_archive", &self.links.retrieve_archive),
        ] {
            if !template.contains(DOCID_PLACEHOLDER) {
                return Err(ConfigError::Validation(format!(
                    "{key} must contain {DOCID_PLACEHOLDER}"
                )));
            }
        }
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        for (key, pattern) in [
            ("metadata.title_pattern", &self.metadata.title_pattern),
            ("metadata.authors_pattern", &self.metadata.authors_pattern),
        ] {
            regex::Regex::new(pattern)
                .map_err(|e| ConfigError::Validation(format!("{key} is not a valid regex: {e}")))?;
        }
        if self.page.index_file.is_empty() || self.page.index_file.contains('/') {
            return Err(ConfigError::Validation(
                "page.index_file must be a plain file name".into(),
            ));
        }
        Ok(())
    }
}

/// Naming rules. Suffix lengths are checked when the convention is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Caption file suffixes; all must have the same length.
    pub caption_suffixes: Vec<String>,
    /// Suffix appended to a source file name to name its thumbnail.
    pub thumbnail_suffix: String,
    /// Thumbnail source extensions, highest priority first.
    pub image_extensions: Vec<String>,
}

impl NamingConfig {
    pub fn convention(&self) -> Result<NamingConvention, ConventionError> {
        let captions = SuffixSet::new(self.caption_suffixes.iter().cloned())?;
        Ok(NamingConvention::new(
            captions,
            self.thumbnail_suffix.clone(),
            self.image_extensions.clone(),
        ))
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            caption_suffixes: vec![CAPTION_TXT.to_string(), CAPTION_TEX.to_string()],
            thumbnail_suffix: THUMB_SUFFIX.to_string(),
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// URL templates; `{docid}` is replaced with the document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Human-facing document page, linked from each section heading.
    pub show_document: String,
    /// Zip archive download used by `import` without a local archive.
    pub retrieve_archive: String,
}

impl LinksConfig {
    pub fn show_document_url(&self, doc_id: &str) -> String {
        self.show_document.replace(DOCID_PLACEHOLDER, doc_id)
    }

    pub fn retrieve_archive_url(&self, doc_id: &str) -> String {
        self.retrieve_archive.replace(DOCID_PLACEHOLDER, doc_id)
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            show_document: "http://microboone-docdb.fnal.gov:8080/cgi-bin/ShowDocument?docid={docid}"
                .to_string(),
            retrieve_archive:
                "http://microboone-docdb.fnal.gov:8080/cgi-bin/RetrieveArchive?docid={docid}&type=zip"
                    .to_string(),
        }
    }
}

/// Which thumbnailer implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailBackend {
    /// ImageMagick `convert` (or a compatible command).
    #[default]
    Convert,
    /// The `image` crate; bitmaps only.
    Builtin,
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub backend: ThumbnailBackend,
    /// Command run by the `convert` backend.
    pub command: String,
    /// Thumbnails fit within `size`×`size` pixels.
    pub size: u32,
    /// Unreported by default; a failed thumbnail still gets its `<img>` link.
    pub on_failure: ThumbnailFailurePolicy,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            backend: ThumbnailBackend::Convert,
            command: "convert".to_string(),
            size: 128,
            on_failure: ThumbnailFailurePolicy::Ignore,
        }
    }
}

/// Remote document metadata lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    pub enabled: bool,
    /// Regex applied to the show-document page; first capture group is the title.
    pub title_pattern: String,
    /// Regex applied to the show-document page; first capture group holds the authors.
    pub authors_pattern: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title_pattern: r#"(?s)<div id="DocTitle">\s*<h1>(.*?)</h1>"#.to_string(),
            authors_pattern: r#"(?s)<div id="Authors">.*?<ul>(.*?)</ul>"#.to_string(),
        }
    }
}

/// Generated page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageLayoutConfig {
    /// Page file name inside the status directory.
    pub index_file: String,
    /// Stylesheet linked from the page head.
    pub stylesheet: String,
}

impl Default for PageLayoutConfig {
    fn default() -> Self {
        Self {
            index_file: "index.html".to_string(),
            stylesheet: "ubplot.css".to_string(),
        }
    }
}

/// Load `caption-index.toml` from `root`, falling back to defaults.
///
/// Rejects unknown keys and validates the result.
pub fn load_config(root: &Path) -> Result<PageConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        PageConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `caption-index.toml` with all keys.
///
/// Library API for tools that seed a pages root with a starter config. The
/// `caption-index` binary takes positional arguments only and does not print it.
pub fn stock_config_toml() -> &'static str {
    r##"# caption-index configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Place this file in the pages root, next to the status directories.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# File naming (the contract between import and page generation)
# ---------------------------------------------------------------------------
[naming]
# Caption file suffixes. All suffixes must have the same length.
caption_suffixes = ["_caption.txt", "_caption.tex"]

# Appended to a source file's name to name its generated thumbnail.
thumbnail_suffix = "_thumb.png"

# Thumbnail source candidates, highest priority first.
image_extensions = ["png", "gif", "jpeg", "jpg", "eps", "pdf"]

# ---------------------------------------------------------------------------
# Document repository links ({docid} is replaced with the document id)
# ---------------------------------------------------------------------------
[links]
show_document = "http://microboone-docdb.fnal.gov:8080/cgi-bin/ShowDocument?docid={docid}"
retrieve_archive = "http://microboone-docdb.fnal.gov:8080/cgi-bin/RetrieveArchive?docid={docid}&type=zip"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# "convert" runs ImageMagick (handles pdf/eps); "builtin" needs no tools
# but only reads bitmap formats.
backend = "convert"
command = "convert"

# Thumbnails fit within size x size pixels.
size = 128

# What a failed thumbnail does to the rebuild:
#   "ignore" - nothing reported, the page still links the thumbnail
#   "warn"   - logged as a warning
#   "fail"   - the rebuild aborts before the page is written
on_failure = "ignore"

# ---------------------------------------------------------------------------
# Document title/author lookup from the show_document page
# ---------------------------------------------------------------------------
[metadata]
enabled = true
title_pattern = '(?s)<div id="DocTitle">\s*<h1>(.*?)</h1>'
authors_pattern = '(?s)<div id="Authors">.*?<ul>(.*?)</ul>'

# ---------------------------------------------------------------------------
# Generated page
# ---------------------------------------------------------------------------
[page]
index_file = "index.html"
stylesheet = "ubplot.css"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_naming_convention() {
        let config = PageConfig::default();
        assert_eq!(
            config.naming.caption_suffixes,
            vec!["_caption.txt", "_caption.tex"]
        );
        assert_eq!(config.naming.thumbnail_suffix, "_thumb.png");
        assert_eq!(
            config.naming.image_extensions,
            vec!["png", "gif", "jpeg", "jpg", "eps", "pdf"]
        );
        assert_eq!(
            config.naming.convention().unwrap(),
            NamingConvention::default()
        );
    }

    #[test]
    fn default_thumbnail_failures_ignored() {
        let config = PageConfig::default();
        assert_eq!(config.thumbnails.on_failure, ThumbnailFailurePolicy::Ignore);
        assert_eq!(config.thumbnails.backend, ThumbnailBackend::Convert);
        assert_eq!(config.thumbnails.size, 128);
    }

    #[test]
    fn link_templates_substitute_docid() {
        let links = LinksConfig::default();
        assert!(links.show_document_url("9876").ends_with("ShowDocument?docid=9876"));
        assert!(
            links
                .retrieve_archive_url("9876")
                .ends_with("RetrieveArchive?docid=9876&type=zip")
        );
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[thumbnails]
backend = "builtin"
on_failure = "warn"
"#;
        let config: PageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.thumbnails.backend, ThumbnailBackend::Builtin);
        assert_eq!(config.thumbnails.on_failure, ThumbnailFailurePolicy::Warn);
        // Defaults preserved
        assert_eq!(config.thumbnails.size, 128);
        assert_eq!(config.page.index_file, "index.html");
    }

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[thumbnails]
sise = 64
"#;
        let result: Result<PageConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<PageConfig, _> = toml::from_str("[thumbs]\nsize = 64\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_policy_rejected() {
        let result: Result<PageConfig, _> = toml::from_str("[thumbnails]\non_failure = \"panic\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(PageConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_unequal_caption_suffixes_fails_fast() {
        let mut config = PageConfig::default();
        config.naming.caption_suffixes = vec!["_caption.txt".into(), "_caption.markdown".into()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Convention(
                ConventionError::UnequalSuffixLengths { .. }
            ))
        ));
    }

    #[test]
    fn validate_equal_custom_suffixes_ok() {
        let mut config = PageConfig::default();
        config.naming.caption_suffixes = vec!["_cap.txt".into(), "_cap.tex".into(), "_cap.md_".into()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_extensions() {
        let mut config = PageConfig::default();
        config.naming.image_extensions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_template_without_placeholder() {
        let mut config = PageConfig::default();
        config.links.show_document = "http://example.org/doc".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("links.show_document"));
    }

    #[test]
    fn validate_zero_thumbnail_size() {
        let mut config = PageConfig::default();
        config.thumbnails.size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bad_regex() {
        let mut config = PageConfig::default();
        config.metadata.title_pattern = "(unclosed".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metadata.title_pattern"));
    }

    #[test]
    fn validate_index_file_must_be_plain_name() {
        let mut config = PageConfig::default();
        config.page.index_file = "../index.html".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[naming]
image_extensions = ["pdf", "png"]

[metadata]
enabled = false
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.naming.image_extensions, vec!["pdf", "png"]);
        assert!(!config.metadata.enabled);
        assert_eq!(config.naming.thumbnail_suffix, "_thumb.png");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[naming]\ncaption_suffixes = [\"_caption.txt\", \"_c.tex\"]\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Convention(_))
        ));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: PageConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn stock_config_toml_seeds_a_loadable_pages_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), stock_config_toml()).unwrap();
        assert_eq!(load_config(tmp.path()).unwrap(), PageConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[naming]", "[links]", "[thumbnails]", "[metadata]", "[page]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }
}
