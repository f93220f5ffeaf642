use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u32 {
        self.x.saturating_add(self.w)
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y2(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x2() <= self.x2() && r.y2() <= self.y2()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn overlaps(&self, r: &Rect) -> bool {
        !(self.x >= r.x2() || r.x >= self.x2() || self.y >= r.y2() || r.y >= self.y2())
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn max_side(&self) -> u32 {
        self.w.max(self.h)
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Opaque identity of a sprite. Unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(u64);

impl SpriteId {
    pub fn next() -> Self {
        Self(next_id())
    }
}

/// Opaque identity of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u64);

impl GroupId {
    pub fn next() -> Self {
        Self(next_id())
    }
}

/// A named raster. The pixel buffer is shared and never mutated by the core;
/// every transformation produces a new `Sprite`.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    /// Display/lookup key. Not guaranteed unique.
    pub name: String,
    pub image: Arc<RgbaImage>,
}

impl Sprite {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            id: SpriteId::next(),
            name: name.into(),
            image: Arc::new(image),
        }
    }

    /// Derived sprite that keeps this sprite's identity and name.
    pub fn with_image(&self, image: RgbaImage) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            image: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Hash of dimensions and raw RGBA bytes.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.image.dimensions().hash(&mut hasher);
        self.image.as_raw().hash(&mut hasher);
        hasher.finish()
    }
}

/// Named, ordered sequence of sprite references (an animation).
/// Member ids may repeat and may reference sprites that no longer exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub member_ids: Vec<SpriteId>,
}

impl Group {
    pub fn new(name: impl Into<String>, member_ids: Vec<SpriteId>) -> Self {
        Self {
            id: GroupId::next(),
            name: name.into(),
            member_ids,
        }
    }
}

/// Crop bookkeeping for one trimmed sprite.
///
/// `offset_*`/`trimmed_*` describe the opaque bounds before any extra padding;
/// `region` is the rectangle actually cropped out of the original (opaque
/// bounds grown by the padding and clamped to the image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRecord {
    pub offset_x: u32,
    pub offset_y: u32,
    pub trimmed_width: u32,
    pub trimmed_height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub region: Rect,
}

impl TrimRecord {
    pub fn opaque_bounds(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.trimmed_width,
            self.trimmed_height,
        )
    }

    /// True if the cropped region is smaller than the original image.
    pub fn is_cropped(&self) -> bool {
        self.region.w != self.original_width || self.region.h != self.original_height
    }
}

/// A rectangle placed inside a bin. `w,h` are copied from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<K = usize> {
    pub key: K,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl<K> Placement<K> {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A frame entry of the atlas descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Sprite name the frame is keyed by.
    pub key: String,
    /// Rectangle within the atlas.
    pub frame: Rect,
    pub rotated: bool,
    pub trimmed: bool,
    /// Placement of the frame content within the original, untrimmed bounds.
    pub source: Rect,
    /// Original (untrimmed) size.
    pub source_size: (u32, u32),
}

/// Group name with the ordered frame names it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub frames: Vec<String>,
}

/// Descriptor metadata (`meta` block).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub image: String,
    pub format: String,
    pub size: (u32, u32),
    pub scale: String,
}

/// Atlas descriptor: frames, animations and canvas metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atlas {
    pub frames: Vec<Frame>,
    pub animations: Vec<Animation>,
    pub meta: Meta,
}

impl Atlas {
    pub fn width(&self) -> u32 {
        self.meta.size.0
    }

    pub fn height(&self) -> u32 {
        self.meta.size.1
    }

    /// Looks up a frame by sprite name. The last entry wins on duplicate names,
    /// matching the serialized form.
    pub fn frame(&self, name: &str) -> Option<&Frame> {
        self.frames.iter().rev().find(|f| f.key == name)
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> PackStats {
        let canvas_area = self.width() as u64 * self.height() as u64;
        let used_frame_area: u64 = self.frames.iter().map(|f| f.frame.area()).sum();
        let num_trimmed = self.frames.iter().filter(|f| f.trimmed).count();
        let occupancy = if canvas_area > 0 {
            used_frame_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        PackStats {
            num_frames: self.frames.len(),
            num_animations: self.animations.len(),
            canvas_width: self.width(),
            canvas_height: self.height(),
            canvas_area,
            used_frame_area,
            occupancy,
            num_trimmed,
        }
    }
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_frames: usize,
    pub num_animations: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub canvas_area: u64,
    /// Sum of frame areas (spacing excluded).
    pub used_frame_area: u64,
    /// used_frame_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
    pub num_trimmed: usize,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Frames: {}, Animations: {}, Occupancy: {:.2}%, Used Area: {} px², Trimmed: {}",
            self.canvas_width,
            self.canvas_height,
            self.num_frames,
            self.num_animations,
            self.occupancy * 100.0,
            self.used_frame_area,
            self.num_trimmed,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_frame_area)
    }
}
