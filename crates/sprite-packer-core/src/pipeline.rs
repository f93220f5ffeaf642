use crate::analyze::AnalysisCache;
use crate::compositing::{alloc_surface, blit_rgba};
use crate::config::{Layout, PackingOptions};
use crate::error::Result;
use crate::model::{
    Animation, Atlas, Frame, Group, Meta, PackStats, Placement, Rect, Size, Sprite, SpriteId,
    TrimRecord,
};
use crate::trim::{pad_sprite, trim_to_bounds};
use image::RgbaImage;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Bin-growth attempts before giving up.
pub const MAX_ATTEMPTS: usize = 10;

/// Output of a packing run: descriptor and composited RGBA canvas.
#[derive(Debug)]
pub struct PackOutput {
    pub atlas: Atlas,
    pub rgba: RgbaImage,
}

impl PackOutput {
    /// Convenience method that delegates to `atlas.stats()`.
    pub fn stats(&self) -> PackStats {
        self.atlas.stats()
    }
}

/// Packs `sprites` into one atlas.
///
/// Returns `Ok(None)` ("no atlas") when `sprites` is empty or the sprites
/// cannot all be placed within `max_width x max_height`; that is an expected
/// outcome, not an error. Errors are reserved for invalid options and surface
/// allocation failures.
pub fn pack_sprites(
    sprites: &[Sprite],
    groups: &[Group],
    options: &PackingOptions,
) -> Result<Option<PackOutput>> {
    let mut cache = AnalysisCache::new();
    pack_sprites_cached(sprites, groups, options, &mut cache)
}

/// Same as `pack_sprites`, reusing opaque bounds from `cache` across runs.
#[instrument(skip_all, fields(sprites = sprites.len(), layout = ?options.layout))]
pub fn pack_sprites_cached(
    sprites: &[Sprite],
    groups: &[Group],
    options: &PackingOptions,
    cache: &mut AnalysisCache,
) -> Result<Option<PackOutput>> {
    options.validate()?;
    if sprites.is_empty() {
        return Ok(None);
    }
    if options.allow_rotation {
        debug!("allow_rotation is accepted but sprites are never rotated");
    }

    let (order, rows) = order_sprites(sprites, groups, options.layout);
    let prepared = order
        .iter()
        .map(|&i| prepare(&sprites[i], options, cache))
        .collect::<Result<Vec<_>>>()?;

    let spacing = options.spacing;
    let items: Vec<Size> = prepared
        .iter()
        .map(|p| Size::new(p.sprite.width() + spacing, p.sprite.height() + spacing))
        .collect();
    let max = Size::new(options.max_width, options.max_height);

    let Some(placements) = search(&items, &rows, max, options) else {
        warn!(
            sprites = items.len(),
            max_width = max.w,
            max_height = max.h,
            "could not pack all sprites"
        );
        return Ok(None);
    };

    let (canvas_w, canvas_h) = used_extent(&placements, &prepared, options.force_power_of_two);
    let mut canvas = alloc_surface(canvas_w, canvas_h)?;
    let mut frames: Vec<Frame> = Vec::with_capacity(placements.len());
    for pl in &placements {
        let prep = &prepared[pl.key];
        let (dw, dh) = (prep.sprite.width(), prep.sprite.height());
        blit_rgba(&prep.sprite.image, &mut canvas, pl.x, pl.y, Rect::new(0, 0, dw, dh));
        frames.push(build_frame(prep, pl));
    }

    let animations = resolve_animations(groups, &prepared);
    let atlas = Atlas {
        frames,
        animations,
        meta: Meta {
            app: "sprite-packer".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            image: options.image_name.clone(),
            format: "RGBA8888".into(),
            size: (canvas_w, canvas_h),
            scale: "1".into(),
        },
    };
    debug!(width = canvas_w, height = canvas_h, frames = atlas.frames.len(), "atlas packed");
    Ok(Some(PackOutput {
        atlas,
        rgba: canvas,
    }))
}

struct Prep {
    sprite: Sprite,
    trim: Option<TrimRecord>,
}

fn prepare(sprite: &Sprite, options: &PackingOptions, cache: &mut AnalysisCache) -> Result<Prep> {
    if options.trim_whitespace {
        let bounds = cache.opaque_bounds(sprite);
        let (trimmed, record) = trim_to_bounds(sprite, bounds, options.padding)?;
        return Ok(Prep {
            sprite: trimmed,
            trim: Some(record),
        });
    }
    let sprite = if options.padding > 0 {
        pad_sprite(sprite, options.padding, options.padding)?
    } else {
        sprite.clone()
    };
    Ok(Prep { sprite, trim: None })
}

/// Packing order (indices into `sprites`) plus, for `ByGroup`, the rows as
/// positions within that order.
///
/// `ByGroup` visits groups by name, members in member order, then a trailing
/// row of ungrouped sprites by name. A sprite is placed once, in the first row
/// that references it.
fn order_sprites(
    sprites: &[Sprite],
    groups: &[Group],
    layout: Layout,
) -> (Vec<usize>, Vec<Vec<usize>>) {
    let by_name = |idx: &mut Vec<usize>| idx.sort_by(|&a, &b| sprites[a].name.cmp(&sprites[b].name));

    if layout != Layout::ByGroup {
        let mut order: Vec<usize> = (0..sprites.len()).collect();
        by_name(&mut order);
        return (order, Vec::new());
    }

    let mut index_of: HashMap<SpriteId, usize> = HashMap::with_capacity(sprites.len());
    for (i, s) in sprites.iter().enumerate() {
        index_of.entry(s.id).or_insert(i);
    }
    let mut sorted_groups: Vec<&Group> = groups.iter().collect();
    sorted_groups.sort_by(|a, b| a.name.cmp(&b.name));

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut order = Vec::with_capacity(sprites.len());
    let mut rows = Vec::with_capacity(sorted_groups.len() + 1);
    for g in sorted_groups {
        let mut row = Vec::new();
        for id in &g.member_ids {
            if let Some(&i) = index_of.get(id) {
                if claimed.insert(i) {
                    row.push(order.len());
                    order.push(i);
                }
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    let mut ungrouped: Vec<usize> = (0..sprites.len()).filter(|i| !claimed.contains(i)).collect();
    by_name(&mut ungrouped);
    if !ungrouped.is_empty() {
        let start = order.len();
        order.extend(ungrouped);
        rows.push((start..order.len()).collect());
    }
    (order, rows)
}

/// Initial bin: side of the square holding the total area, at least the
/// largest side, pow2-rounded if requested, clamped to `max`.
fn initial_bin(items: &[Size], max: Size, pow2: bool) -> Size {
    let total_area: u64 = items.iter().map(Size::area).sum();
    let max_side = items.iter().map(Size::max_side).max().unwrap_or(1);
    let mut side = ((total_area as f64).sqrt().ceil() as u32).max(max_side).max(1);
    if pow2 {
        side = next_pow2(side);
    }
    Size::new(side.min(max.w), side.min(max.h))
}

/// Grows the narrower side that still has room: doubling under pow2,
/// otherwise x1.5. `None` once both sides are at their max.
fn grow(bin: Size, max: Size, pow2: bool) -> Option<Size> {
    let step = |v: u32, cap: u32| {
        let next = if pow2 {
            v.saturating_mul(2)
        } else {
            v.saturating_add(v.div_ceil(2))
        };
        next.min(cap)
    };
    if bin.w < max.w && (bin.w <= bin.h || bin.h >= max.h) {
        Some(Size::new(step(bin.w, max.w), bin.h))
    } else if bin.h < max.h {
        Some(Size::new(bin.w, step(bin.h, max.h)))
    } else {
        None
    }
}

fn search(
    items: &[Size],
    rows: &[Vec<usize>],
    max: Size,
    options: &PackingOptions,
) -> Option<Vec<Placement>> {
    let layout = options.layout;
    let pow2 = options.force_power_of_two;
    let mut bin = initial_bin(items, max, pow2);
    for attempt in 1..=MAX_ATTEMPTS {
        let placements = layout.arrange(items, rows, bin, max);
        debug!(
            attempt,
            width = bin.w,
            height = bin.h,
            placed = placements.len(),
            total = items.len(),
            "layout attempt"
        );
        if placements.len() == items.len() {
            return Some(placements);
        }
        // shelf layouts are bounded by `max` only; growing the bin changes nothing
        if layout != Layout::Compact {
            return None;
        }
        bin = grow(bin, max, pow2)?;
    }
    None
}

/// Canvas size covering every drawn (spacing-free) rectangle.
fn used_extent(placements: &[Placement], prepared: &[Prep], pow2: bool) -> (u32, u32) {
    let mut w = 1u32;
    let mut h = 1u32;
    for pl in placements {
        let sprite = &prepared[pl.key].sprite;
        w = w.max(pl.x + sprite.width());
        h = h.max(pl.y + sprite.height());
    }
    if pow2 {
        w = next_pow2(w);
        h = next_pow2(h);
    }
    (w, h)
}

fn build_frame(prep: &Prep, pl: &Placement) -> Frame {
    let (dw, dh) = (prep.sprite.width(), prep.sprite.height());
    let (trimmed, source, source_size) = match &prep.trim {
        Some(t) => (
            t.is_cropped(),
            t.region,
            (t.original_width, t.original_height),
        ),
        None => (false, Rect::new(0, 0, dw, dh), (dw, dh)),
    };
    Frame {
        key: prep.sprite.name.clone(),
        frame: Rect::new(pl.x, pl.y, dw, dh),
        rotated: false,
        trimmed,
        source,
        source_size,
    }
}

/// Resolves group members against the packed sprites. Unknown ids are
/// dropped; groups left with no frames are omitted.
fn resolve_animations(groups: &[Group], prepared: &[Prep]) -> Vec<Animation> {
    let mut names: HashMap<SpriteId, &str> = HashMap::with_capacity(prepared.len());
    for p in prepared {
        names.entry(p.sprite.id).or_insert(p.sprite.name.as_str());
    }
    groups
        .iter()
        .filter_map(|g| {
            let frames: Vec<String> = g
                .member_ids
                .iter()
                .filter_map(|id| names.get(id).map(|n| n.to_string()))
                .collect();
            (!frames.is_empty()).then(|| Animation {
                name: g.name.clone(),
                frames,
            })
        })
        .collect()
}

/// Saturates at `u32::MAX`.
fn next_pow2(v: u32) -> u32 {
    v.max(1).checked_next_power_of_two().unwrap_or(u32::MAX)
}
