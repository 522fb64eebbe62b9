//! Document title and author lookup.
//!
//! Section headings can carry the document's title and authors, scraped from
//! the document repository's "show document" page. The scrape is two regexes
//! (configurable in `[metadata]`) whose first capture group is parsed as HTML
//! and reduced to its text, with entities decoded and whitespace collapsed.
//!
//! A lookup never fails the rebuild: a pattern that does not match, or a page
//! that cannot be fetched, yields empty strings and a warning.

use crate::config::{LinksConfig, MetadataConfig};
use crate::types::DocMetadata;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::time::Duration;

/// Source of per-document metadata.
pub trait DocMetadataLookup {
    fn lookup(&self, doc_id: &str) -> DocMetadata;
}

/// Compiled title/authors patterns.
#[derive(Debug, Clone)]
pub struct MetadataPatterns {
    title: Regex,
    authors: Regex,
}

impl MetadataPatterns {
    pub fn new(config: &MetadataConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            title: Regex::new(&config.title_pattern)?,
            authors: Regex::new(&config.authors_pattern)?,
        })
    }

    /// Extract metadata from a fetched page. Misses are empty strings.
    pub fn extract(&self, doc_id: &str, html: &str) -> DocMetadata {
        let title = first_capture(&self.title, html);
        let authors = first_capture(&self.authors, html);
        if title.is_none() {
            log::warn!("No title found for document {}", doc_id);
        }
        if authors.is_none() {
            log::warn!("No authors found for document {}", doc_id);
        }
        DocMetadata {
            title: title.unwrap_or_default(),
            authors: authors.unwrap_or_default(),
        }
    }
}

fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Text content of an HTML fragment with entities decoded and whitespace
/// collapsed. List items are joined with commas.
fn clean_text(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    let items: Vec<String> = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "li")
        .map(|li| collapse_whitespace(li.text()))
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        collapse_whitespace(html.root_element().text())
    } else {
        items.join(", ")
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let text: String = parts.collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetches the show-document page over HTTP.
pub struct HttpMetadataLookup {
    client: reqwest::blocking::Client,
    links: LinksConfig,
    patterns: MetadataPatterns,
}

impl HttpMetadataLookup {
    pub fn new(links: LinksConfig, patterns: MetadataPatterns) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            links,
            patterns,
        })
    }

    fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send()?.error_for_status()?.text()
    }
}

impl DocMetadataLookup for HttpMetadataLookup {
    fn lookup(&self, doc_id: &str) -> DocMetadata {
        let url = self.links.show_document_url(doc_id);
        log::debug!("Fetching metadata for {} from {}", doc_id, url);
        match self.fetch(&url) {
            Ok(html) => self.patterns.extract(doc_id, &html),
            Err(e) => {
                log::warn!("Metadata lookup for {} failed: {}", doc_id, e);
                DocMetadata::default()
            }
        }
    }
}
