//! ImageMagick `convert` thumbnailer.
//!
//! Runs `convert -resize NxN <source> <output>`. ImageMagick reads pdf and
//! eps (through Ghostscript) as well as bitmaps, which is why this is the
//! default backend. Exit status is checked; a missing binary or a non-zero
//! exit is a [`ThumbnailOutcome::ToolFailed`].

use super::backend::{ImageThumbnailer, ThumbnailOutcome};
use std::path::Path;
use std::process::Command;

pub struct ConvertThumbnailer {
    command: String,
    size: u32,
}

impl ConvertThumbnailer {
    pub fn new(command: impl Into<String>, size: u32) -> Self {
        Self {
            command: command.into(),
            size,
        }
    }

    fn geometry(&self) -> String {
        format!("{0}x{0}", self.size)
    }
}

impl Default for ConvertThumbnailer {
    fn default() -> Self {
        Self::new("convert", 128)
    }
}

impl ImageThumbnailer for ConvertThumbnailer {
    fn thumbnail(&self, source: &Path, output: &Path) -> ThumbnailOutcome {
        let failed = |reason: String| ThumbnailOutcome::ToolFailed {
            output: output.to_path_buf(),
            reason,
        };

        let result = Command::new(&self.command)
            .arg("-resize")
            .arg(self.geometry())
            .arg(source)
            .arg(output)
            .output();

        match result {
            Ok(out) if out.status.success() => ThumbnailOutcome::Created(output.to_path_buf()),
            Ok(out) => failed(format!(
                "{} exited with {}: {}",
                self.command,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )),
            Err(e) => failed(format!("could not run {}: {}", self.command, e)),
        }
    }
}
