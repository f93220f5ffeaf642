use crate::analyze;
use crate::compositing::{alloc_surface, blit_rgba};
use crate::error::Result;
use crate::model::{Rect, Sprite, TrimRecord};

/// Crops `sprite` to its opaque bounds grown by `extra_padding` (clamped to the
/// image). The returned sprite keeps the source id and name.
pub fn trim_sprite(sprite: &Sprite, extra_padding: u32) -> Result<(Sprite, TrimRecord)> {
    let bounds = analyze::opaque_bounds(&sprite.image);
    trim_to_bounds(sprite, bounds, extra_padding)
}

/// Same as `trim_sprite` with precomputed opaque bounds (e.g. from an
/// `AnalysisCache`).
pub fn trim_to_bounds(
    sprite: &Sprite,
    bounds: Rect,
    extra_padding: u32,
) -> Result<(Sprite, TrimRecord)> {
    let (w, h) = (sprite.width(), sprite.height());
    let region = padded_region(bounds, extra_padding, w, h);

    let mut cropped = alloc_surface(region.w, region.h)?;
    blit_rgba(&sprite.image, &mut cropped, 0, 0, region);

    let record = TrimRecord {
        offset_x: bounds.x,
        offset_y: bounds.y,
        trimmed_width: bounds.w,
        trimmed_height: bounds.h,
        original_width: w,
        original_height: h,
        region,
    };
    Ok((sprite.with_image(cropped), record))
}

fn padded_region(bounds: Rect, pad: u32, w: u32, h: u32) -> Rect {
    let x = bounds.x.saturating_sub(pad);
    let y = bounds.y.saturating_sub(pad);
    let x2 = bounds.x2().saturating_add(pad).min(w);
    let y2 = bounds.y2().saturating_add(pad).min(h);
    Rect::new(x, y, x2 - x, y2 - y)
}

/// Returns a larger copy of `sprite` with the original drawn at
/// (padding_x, padding_y) and transparent borders on every side.
pub fn pad_sprite(sprite: &Sprite, padding_x: u32, padding_y: u32) -> Result<Sprite> {
    let (w, h) = (sprite.width(), sprite.height());
    let mut canvas = alloc_surface(
        w.saturating_add(padding_x.saturating_mul(2)),
        h.saturating_add(padding_y.saturating_mul(2)),
    )?;
    blit_rgba(
        &sprite.image,
        &mut canvas,
        padding_x,
        padding_y,
        Rect::new(0, 0, w, h),
    );
    Ok(sprite.with_image(canvas))
}
