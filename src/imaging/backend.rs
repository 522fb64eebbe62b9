//! Thumbnail generation capability.
//!
//! The [`ImageThumbnailer`] trait hides *how* a thumbnail gets made. Callers
//! get a [`ThumbnailOutcome`] back instead of an error, because a missing
//! thumbnail never invalidates the page on its own: whether it should is the
//! caller's decision, expressed as a [`ThumbnailFailurePolicy`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result of one thumbnail attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Created(PathBuf),
    ToolFailed { output: PathBuf, reason: String },
}

impl ThumbnailOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Scales a source file into a same-directory thumbnail.
pub trait ImageThumbnailer {
    /// Write a thumbnail of `source` to `output`.
    fn thumbnail(&self, source: &Path, output: &Path) -> ThumbnailOutcome;
}

/// How a failed thumbnail affects the rebuild.
///
/// `Ignore` is the default and matches the historical behavior: the page
/// still links the (missing) thumbnail and nothing is reported above debug
/// level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailFailurePolicy {
    #[default]
    Ignore,
    Warn,
    Fail,
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records requests; fails for any source whose name is in `failing`.
    #[derive(Default)]
    pub struct MockThumbnailer {
        pub requests: RefCell<Vec<(String, String)>>,
        pub failing: Vec<String>,
    }

    impl MockThumbnailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(names: &[&str]) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                failing: names.iter().map(|s| s.to_string()).collect(),
            }
        }

        /// Requested (source, output) file names, in call order.
        pub fn requested_names(&self) -> Vec<(String, String)> {
            self.requests.borrow().clone()
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    impl ImageThumbnailer for MockThumbnailer {
        fn thumbnail(&self, source: &Path, output: &Path) -> ThumbnailOutcome {
            let src = file_name(source);
            self.requests.borrow_mut().push((src.clone(), file_name(output)));
            if self.failing.contains(&src) {
                ThumbnailOutcome::ToolFailed {
                    output: output.to_path_buf(),
                    reason: "mock failure".to_string(),
                }
            } else {
                ThumbnailOutcome::Created(output.to_path_buf())
            }
        }
    }

    #[test]
    fn mock_records_requests() {
        let mock = MockThumbnailer::new();
        let outcome = mock.thumbnail(Path::new("/d/fig1.png"), Path::new("/d/fig1.png_thumb.png"));
        assert!(outcome.is_created());
        assert_eq!(
            mock.requested_names(),
            vec![("fig1.png".to_string(), "fig1.png_thumb.png".to_string())]
        );
    }

    #[test]
    fn mock_fails_on_request() {
        let mock = MockThumbnailer::failing_on(&["fig1.pdf"]);
        let outcome = mock.thumbnail(Path::new("fig1.pdf"), Path::new("fig1.pdf_thumb.png"));
        assert!(!outcome.is_created());
    }

    #[test]
    fn policy_defaults_to_ignore() {
        assert_eq!(ThumbnailFailurePolicy::default(), ThumbnailFailurePolicy::Ignore);
    }
}
