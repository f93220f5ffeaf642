//! Alpha-bounds analysis and frame classification.
//!
//! Everything here is a pure read of pixel data. `scan` walks the image once and
//! gathers the opaque bounding box together with the transparent/solid verdicts;
//! the other functions are views over its result.

use crate::model::{Rect, Sprite, SpriteId};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of one full pass over an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelScan {
    /// Tight box around pixels with alpha > 0, or `None` if there are none.
    pub bounds: Option<Rect>,
    /// Every pixel has alpha == 0.
    pub transparent: bool,
    /// At least one visible pixel, and all visible pixels share one RGBA value.
    pub solid: bool,
}

/// Transparent/solid verdict for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub transparent: bool,
    pub solid: bool,
}

impl Classification {
    /// Empty or degenerate: nothing worth keeping as a frame.
    pub fn is_empty_or_degenerate(&self) -> bool {
        self.transparent || self.solid
    }
}

impl From<PixelScan> for Classification {
    fn from(scan: PixelScan) -> Self {
        Self {
            transparent: scan.transparent,
            solid: scan.solid,
        }
    }
}

pub fn scan(image: &RgbaImage) -> PixelScan {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut reference: Option<Rgba<u8>> = None;
    let mut solid = true;

    for (x, y, px) in image.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
        match reference {
            None => reference = Some(*px),
            Some(r) => {
                if solid && r != *px {
                    solid = false;
                }
            }
        }
    }

    if reference.is_none() {
        return PixelScan {
            bounds: None,
            transparent: true,
            solid: false,
        };
    }
    PixelScan {
        bounds: Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)),
        transparent: false,
        solid,
    }
}

/// Minimal box covering every pixel with alpha > 0.
///
/// A fully transparent image yields its full bounds ("nothing to trim"), so a
/// non-degenerate result does not imply content.
pub fn opaque_bounds(image: &RgbaImage) -> Rect {
    let (w, h) = image.dimensions();
    scan(image).bounds.unwrap_or(Rect::new(0, 0, w, h))
}

pub fn is_fully_transparent(image: &RgbaImage) -> bool {
    image.pixels().all(|p| p[3] == 0)
}

/// True iff at least one pixel is visible and every visible pixel has the
/// same RGBA value. Fully transparent images are not solid.
pub fn is_solid_color(image: &RgbaImage) -> bool {
    scan(image).solid
}

pub fn classify(image: &RgbaImage) -> Classification {
    scan(image).into()
}

/// Batch classification of a frame list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameAnalysis {
    pub transparent: Vec<SpriteId>,
    pub solid_color: Vec<SpriteId>,
    /// Union of the two lists above, in input order.
    pub empty_or_solid: Vec<SpriteId>,
    pub total: usize,
}

#[instrument(skip_all, fields(frames = sprites.len()))]
pub fn analyze_frames(sprites: &[Sprite]) -> FrameAnalysis {
    #[cfg(feature = "parallel")]
    let verdicts: Vec<Classification> = sprites.par_iter().map(|s| classify(&s.image)).collect();
    #[cfg(not(feature = "parallel"))]
    let verdicts: Vec<Classification> = sprites.iter().map(|s| classify(&s.image)).collect();

    let mut out = FrameAnalysis {
        total: sprites.len(),
        ..Default::default()
    };
    for (sprite, verdict) in sprites.iter().zip(verdicts) {
        if verdict.transparent {
            out.transparent.push(sprite.id);
        } else if verdict.solid {
            out.solid_color.push(sprite.id);
        }
        if verdict.is_empty_or_degenerate() {
            out.empty_or_solid.push(sprite.id);
        }
    }
    out
}

/// Memoizes scans per sprite identity and pixel content, so repeated option
/// changes don't rescan unchanged sprites.
///
/// Holds one entry per sprite id. A lookup with the same pixel buffer as the
/// cached entry costs a pointer comparison; a different buffer is hashed once
/// and either adopted (same pixels) or rescanned, replacing the old entry.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<SpriteId, CacheEntry>,
    stats: CacheStats,
}

#[derive(Debug)]
struct CacheEntry {
    // keeps the allocation alive, so its address can't be reused by another buffer
    image: Weak<RgbaImage>,
    hash: u64,
    scan: PixelScan,
}

impl CacheEntry {
    fn holds(&self, image: &Arc<RgbaImage>) -> bool {
        std::ptr::eq(self.image.as_ptr(), Arc::as_ptr(image))
    }
}

/// Lookup counters of an [`AnalysisCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from an entry.
    pub hits: u64,
    /// Content hashes computed for buffers the cache had not seen.
    pub hashes: u64,
    /// Full pixel scans.
    pub scans: u64,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_scan(&mut self, sprite: &Sprite) -> PixelScan {
        if let Some(entry) = self.entries.get(&sprite.id) {
            if entry.holds(&sprite.image) {
                self.stats.hits += 1;
                return entry.scan;
            }
        }

        let hash = sprite.content_hash();
        self.stats.hashes += 1;
        if let Some(entry) = self.entries.get_mut(&sprite.id) {
            if entry.hash == hash {
                entry.image = Arc::downgrade(&sprite.image);
                self.stats.hits += 1;
                return entry.scan;
            }
        }

        let fresh = scan(&sprite.image);
        self.stats.scans += 1;
        self.entries.insert(
            sprite.id,
            CacheEntry {
                image: Arc::downgrade(&sprite.image),
                hash,
                scan: fresh,
            },
        );
        fresh
    }

    pub fn classify(&mut self, sprite: &Sprite) -> Classification {
        self.get_or_scan(sprite).into()
    }

    pub fn opaque_bounds(&mut self, sprite: &Sprite) -> Rect {
        let full = Rect::new(0, 0, sprite.width(), sprite.height());
        self.get_or_scan(sprite).bounds.unwrap_or(full)
    }

    /// Drops entries for sprites not in `live`.
    pub fn retain_ids(&mut self, live: &[SpriteId]) {
        self.entries.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
