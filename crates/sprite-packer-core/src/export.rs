use crate::error::{Result, SpritePackerError};
use crate::model::{Animation, Atlas, Frame, Meta, Rect};
use serde_json::{Map, Value, json};

/// Serialize the atlas as a JSON hash keyed by sprite name.
///
/// Shape: `{ frames: { name: { frame, rotated, trimmed, spriteSourceSize, sourceSize } },
/// animations: { group: [name, ..] }, meta: { app, version, image, format, size, scale } }`.
/// Frames keep packing order; on duplicate names the later frame wins.
pub fn to_json_hash(atlas: &Atlas) -> Value {
    let mut frames = Map::new();
    for fr in &atlas.frames {
        frames.insert(
            fr.key.clone(),
            json!({
                "frame": {"x": fr.frame.x, "y": fr.frame.y, "w": fr.frame.w, "h": fr.frame.h},
                "rotated": fr.rotated,
                "trimmed": fr.trimmed,
                "spriteSourceSize": {"x": fr.source.x, "y": fr.source.y, "w": fr.source.w, "h": fr.source.h},
                "sourceSize": {"w": fr.source_size.0, "h": fr.source_size.1},
            }),
        );
    }
    let mut animations = Map::new();
    for anim in &atlas.animations {
        animations.insert(anim.name.clone(), json!(anim.frames));
    }
    let m = &atlas.meta;
    json!({
        "frames": frames,
        "animations": animations,
        "meta": {
            "app": m.app,
            "version": m.version,
            "image": m.image,
            "format": m.format,
            "size": {"w": m.size.0, "h": m.size.1},
            "scale": m.scale,
        },
    })
}

/// Parses a JSON hash descriptor (the shape written by `to_json_hash`, or a
/// compatible TexturePacker/PixiJS file).
///
/// Missing fields fall back the lenient way: `rotated`/`trimmed` false,
/// `spriteSourceSize` the frame at the origin, `sourceSize` the frame size.
/// A trailing image extension is stripped from frame names.
pub fn from_json_hash(value: &Value) -> Result<Atlas> {
    let root = value
        .as_object()
        .ok_or_else(|| invalid("descriptor is not a JSON object"))?;
    let frames_obj = root
        .get("frames")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("missing `frames` object"))?;

    let mut frames = Vec::with_capacity(frames_obj.len());
    for (name, entry) in frames_obj {
        frames.push(parse_frame(name, entry)?);
    }

    let mut animations = Vec::new();
    if let Some(anims) = root.get("animations").and_then(Value::as_object) {
        for (name, list) in anims {
            let names: Vec<String> = list
                .as_array()
                .map(|a| {
                    a.iter()
                        .filter_map(Value::as_str)
                        .map(strip_image_extension)
                        .collect()
                })
                .unwrap_or_default();
            animations.push(Animation {
                name: name.clone(),
                frames: names,
            });
        }
    }

    let meta_val = root.get("meta");
    let meta_str = |key: &str, default: &str| {
        meta_val
            .and_then(|m| m.get(key))
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| default.to_string())
    };
    let size = meta_val.and_then(|m| m.get("size"));
    let meta = Meta {
        app: meta_str("app", ""),
        version: meta_str("version", ""),
        image: meta_str("image", ""),
        format: meta_str("format", "RGBA8888"),
        size: (
            dim(size, &["w", "width"]).unwrap_or(0),
            dim(size, &["h", "height"]).unwrap_or(0),
        ),
        scale: meta_str("scale", "1"),
    };

    Ok(Atlas {
        frames,
        animations,
        meta,
    })
}

fn parse_frame(name: &str, entry: &Value) -> Result<Frame> {
    let fr = entry
        .get("frame")
        .ok_or_else(|| invalid(format!("frame `{name}` has no `frame` rectangle")))?;
    let frame = Rect::new(
        dim(Some(fr), &["x"]).unwrap_or(0),
        dim(Some(fr), &["y"]).unwrap_or(0),
        dim(Some(fr), &["w", "width"])
            .ok_or_else(|| invalid(format!("frame `{name}` has no width")))?,
        dim(Some(fr), &["h", "height"])
            .ok_or_else(|| invalid(format!("frame `{name}` has no height")))?,
    );
    let flag = |key: &str| entry.get(key).and_then(Value::as_bool).unwrap_or(false);
    let rotated = flag("rotated");
    // upright size of the content
    let (uw, uh) = if rotated {
        (frame.h, frame.w)
    } else {
        (frame.w, frame.h)
    };

    let sss = entry.get("spriteSourceSize");
    let source = Rect::new(
        dim(sss, &["x"]).unwrap_or(0),
        dim(sss, &["y"]).unwrap_or(0),
        dim(sss, &["w", "width"]).unwrap_or(uw),
        dim(sss, &["h", "height"]).unwrap_or(uh),
    );
    let ss = entry.get("sourceSize");
    let source_size = (
        dim(ss, &["w", "width"]).unwrap_or(uw),
        dim(ss, &["h", "height"]).unwrap_or(uh),
    );

    Ok(Frame {
        key: strip_image_extension(name),
        frame,
        rotated,
        trimmed: flag("trimmed"),
        source,
        source_size,
    })
}

fn dim(obj: Option<&Value>, keys: &[&str]) -> Option<u32> {
    let obj = obj?;
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_u64))
        .and_then(|v| u32::try_from(v).ok())
}

fn strip_image_extension(name: &str) -> String {
    const EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".bmp"];
    let lower = name.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| name[..name.len() - ext.len()].to_string())
        .unwrap_or_else(|| name.to_string())
}

fn invalid(msg: impl Into<String>) -> SpritePackerError {
    SpritePackerError::InvalidInput(msg.into())
}
