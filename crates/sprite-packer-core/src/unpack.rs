use crate::compositing::{alloc_surface, blit_rgba, blit_rgba_unrotate};
use crate::error::Result;
use crate::model::{Atlas, Group, Rect, Sprite, SpriteId};
use image::RgbaImage;
use std::collections::HashMap;
use tracing::{instrument, warn};

/// Sprites and groups rebuilt from a packed atlas.
#[derive(Debug)]
pub struct UnpackedSheet {
    pub sprites: Vec<Sprite>,
    pub groups: Vec<Group>,
}

/// Rebuilds every frame of `atlas` at its original size from `raster`.
///
/// The frame content is drawn at `spriteSourceSize` inside a canvas of
/// `sourceSize`; rotated frames are turned back upright. The resulting sprites
/// carry no packing metadata, so repacking them computes it afresh. Frames
/// reaching outside `raster`, or whose content does not fit inside
/// `sourceSize`, are skipped.
#[instrument(skip_all, fields(frames = atlas.frames.len()))]
pub fn unpack_atlas(raster: &RgbaImage, atlas: &Atlas) -> Result<UnpackedSheet> {
    let bounds = Rect::new(0, 0, raster.width(), raster.height());
    let mut sprites = Vec::with_capacity(atlas.frames.len());
    let mut by_name: HashMap<&str, SpriteId> = HashMap::new();

    for fr in &atlas.frames {
        if !bounds.contains(&fr.frame) {
            warn!(frame = %fr.key, "frame lies outside the atlas image; skipped");
            continue;
        }
        let (w, h) = fr.source_size;
        let (cw, ch) = if fr.rotated {
            (fr.frame.h, fr.frame.w)
        } else {
            (fr.frame.w, fr.frame.h)
        };
        let content = Rect::new(fr.source.x, fr.source.y, cw, ch);
        if !Rect::new(0, 0, w, h).contains(&content) {
            warn!(frame = %fr.key, "frame content does not fit its source size; skipped");
            continue;
        }
        let mut canvas = alloc_surface(w, h)?;
        if fr.rotated {
            blit_rgba_unrotate(raster, &mut canvas, fr.source.x, fr.source.y, fr.frame);
        } else {
            blit_rgba(raster, &mut canvas, fr.source.x, fr.source.y, fr.frame);
        }
        let sprite = Sprite::new(fr.key.clone(), canvas);
        by_name.insert(fr.key.as_str(), sprite.id);
        sprites.push(sprite);
    }

    let groups = atlas
        .animations
        .iter()
        .filter_map(|anim| {
            let ids: Vec<SpriteId> = anim
                .frames
                .iter()
                .filter_map(|n| by_name.get(n.as_str()).copied())
                .collect();
            (!ids.is_empty()).then(|| Group::new(anim.name.clone(), ids))
        })
        .collect();

    Ok(UnpackedSheet { sprites, groups })
}
