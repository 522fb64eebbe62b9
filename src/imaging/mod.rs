//! Thumbnail source selection and thumbnail generation.
//!
//! | Piece | Role |
//! |---|---|
//! | [`select_thumbnail_source`] | Pure: pick one file per group by extension priority |
//! | [`ImageThumbnailer`] | Capability: turn a source file into a scaled thumbnail |
//! | [`ConvertThumbnailer`] | ImageMagick `convert` (handles pdf/eps) |
//! | [`BuiltinThumbnailer`] | `image` crate, no external tools |
//! | [`ThumbnailFailurePolicy`] | What a failed thumbnail means for the rebuild |
//!
//! The module is split into:
//! - **Selection**: pure priority matching (unit testable)
//! - **Backend**: [`ImageThumbnailer`] trait, [`ThumbnailOutcome`], policy
//! - **Convert / Rust backend**: the two implementations

pub mod backend;
pub mod convert;
pub mod rust_backend;
mod selection;

pub use backend::{ImageThumbnailer, ThumbnailFailurePolicy, ThumbnailOutcome};
pub use convert::ConvertThumbnailer;
pub use rust_backend::BuiltinThumbnailer;
pub use selection::select_thumbnail_source;
