use crate::error::{Result, SpritePackerError};
use crate::model::Rect;
use image::RgbaImage;

/// Largest width or height a drawing surface may have.
pub const MAX_SURFACE_DIM: u32 = 32_767;
/// Largest pixel count a drawing surface may have.
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Allocates a fully transparent RGBA surface.
///
/// Fails with `RenderTargetUnavailable` when the size exceeds the surface
/// limits or the pixel buffer cannot be reserved.
pub fn alloc_surface(width: u32, height: u32) -> Result<RgbaImage> {
    let unavailable = || SpritePackerError::RenderTargetUnavailable { width, height };
    let area = width as u64 * height as u64;
    if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM || area > MAX_SURFACE_AREA {
        return Err(unavailable());
    }
    let len = usize::try_from(area * 4).map_err(|_| unavailable())?;
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| unavailable())?;
    buf.resize(len, 0);
    RgbaImage::from_raw(width, height, buf).ok_or_else(unavailable)
}

/// Copies the `src_rect` region of `src` into `canvas` with its top-left at
/// (dx, dy). Pixels falling outside either image are skipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, src_rect: Rect) {
    let (sw, sh) = src.dimensions();
    let (cw, ch) = canvas.dimensions();
    for yy in 0..src_rect.h {
        let (Some(sy), Some(ty)) = (src_rect.y.checked_add(yy), dy.checked_add(yy)) else {
            break;
        };
        if sy >= sh || ty >= ch {
            break;
        }
        for xx in 0..src_rect.w {
            let (Some(sx), Some(tx)) = (src_rect.x.checked_add(xx), dx.checked_add(xx)) else {
                break;
            };
            if sx >= sw || tx >= cw {
                break;
            }
            canvas.put_pixel(tx, ty, *src.get_pixel(sx, sy));
        }
    }
}

/// Like `blit_rgba`, but the source region is stored rotated 90° clockwise
/// and is drawn rotated back (counter-clockwise) into an upright `w=src_rect.h,
/// h=src_rect.w` area.
pub fn blit_rgba_unrotate(
    src: &RgbaImage,
    canvas: &mut RgbaImage,
    dx: u32,
    dy: u32,
    src_rect: Rect,
) {
    let (sw, sh) = src.dimensions();
    let (cw, ch) = canvas.dimensions();
    // upright size
    let (rw, rh) = (src_rect.h, src_rect.w);
    for yy in 0..rh {
        let Some(ty) = dy.checked_add(yy).filter(|&ty| ty < ch) else {
            break;
        };
        for xx in 0..rw {
            let Some(tx) = dx.checked_add(xx).filter(|&tx| tx < cw) else {
                break;
            };
            // inverse of the clockwise mapping (x, y) -> (h - 1 - y, x)
            let sx = src_rect.x.checked_add(src_rect.w - 1 - yy);
            let sy = src_rect.y.checked_add(xx);
            if let (Some(sx), Some(sy)) = (sx, sy) {
                if sx < sw && sy < sh {
                    canvas.put_pixel(tx, ty, *src.get_pixel(sx, sy));
                }
            }
        }
    }
}
