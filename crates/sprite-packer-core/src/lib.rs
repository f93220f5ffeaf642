//! Core library for packing sprites into atlases and slicing sprite strips.
//!
//! - Packing: binary-tree packer plus shelf and per-group layouts, with a
//!   bin-growth search and shrink-to-extent canvas sizing
//! - Trimming and pixel classification with a single-pass scan and cache
//! - Strip slicing and strip-detection heuristics
//! - JSON hash descriptor writer/reader and atlas unpacking
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use sprite_packer_core::{PackingOptions, Sprite, pack_sprites, to_json_hash};
//! # fn main() -> anyhow::Result<()> {
//! let a = ImageReader::open("a.png")?.decode()?.to_rgba8();
//! let b = ImageReader::open("b.png")?.decode()?.to_rgba8();
//! let sprites = vec![Sprite::new("a", a), Sprite::new("b", b)];
//! let opts = PackingOptions { max_width: 1024, max_height: 1024, ..Default::default() };
//! if let Some(out) = pack_sprites(&sprites, &[], &opts)? {
//!     println!("{}", to_json_hash(&out.atlas));
//! }
//! # Ok(()) }
//! ```

pub mod analyze;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod slicer;
pub mod strip;
pub mod trim;
pub mod unpack;

pub use analyze::{
    AnalysisCache, CacheStats, Classification, FrameAnalysis, PixelScan, analyze_frames,
};
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::{Packer, pack_all};
pub use pipeline::*;
pub use slicer::*;
pub use strip::{looks_like_strip, suggest_grid};
pub use trim::*;
pub use unpack::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::analyze::{AnalysisCache, Classification, analyze_frames, classify};
    pub use crate::config::{Layout, PackingOptions, PackingOptionsBuilder, Preset};
    pub use crate::model::{Atlas, Frame, Group, Meta, PackStats, Rect, Sprite, SpriteId};
    pub use crate::slicer::{SliceGrid, slice_strip, slice_strip_as_group};
    pub use crate::strip::{looks_like_strip, suggest_grid};
    pub use crate::{
        PackOutput, from_json_hash, pack_sprites, pack_sprites_cached, to_json_hash,
        unpack_atlas,
    };
}
