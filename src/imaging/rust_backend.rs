//! Pure Rust thumbnailer, no external tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, GIF, JPEG, TIFF, WebP) | `image::ImageReader` |
//! | Scale to fit | `DynamicImage::thumbnail` |
//! | Encode | format inferred from the output extension (`png` by default) |
//!
//! Vector and document formats (pdf, eps) cannot be decoded here and come
//! back as [`ThumbnailOutcome::ToolFailed`]; use the `convert` backend when
//! those need previews.

use super::backend::{ImageThumbnailer, ThumbnailOutcome};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Thumbnailer backed by the `image` crate.
pub struct BuiltinThumbnailer {
    size: u32,
}

impl BuiltinThumbnailer {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl Default for BuiltinThumbnailer {
    fn default() -> Self {
        Self::new(128)
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, String> {
    ImageReader::open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?
        .with_guessed_format()
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
        .decode()
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))
}

fn save_image(img: &DynamicImage, path: &Path) -> Result<(), String> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    img.save_with_format(path, format)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

impl ImageThumbnailer for BuiltinThumbnailer {
    fn thumbnail(&self, source: &Path, output: &Path) -> ThumbnailOutcome {
        let result = load_image(source).and_then(|img| {
            // Fits within size×size, aspect ratio preserved
            let scaled = img.thumbnail(self.size, self.size);
            save_image(&scaled, output)
        });
        match result {
            Ok(()) => ThumbnailOutcome::Created(output.to_path_buf()),
            Err(reason) => ThumbnailOutcome::ToolFailed {
                output: output.to_path_buf(),
                reason,
            },
        }
    }
}
