use image::{Rgba, RgbaImage};
use sprite_packer_core::prelude::*;

fn sprite_with_block(name: &str, w: u32, h: u32, color: Rgba<u8>) -> Sprite {
    let mut img = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]));
    for y in h / 4..h / 2 + 1 {
        for x in w / 3..w - 1 {
            img.put_pixel(x, y, color);
        }
    }
    Sprite::new(name, img)
}

#[test]
fn trimmed_sheet_unpacks_to_original_pixels() {
    let sprites = vec![
        sprite_with_block("a", 12, 9, Rgba([255, 0, 0, 255])),
        sprite_with_block("b", 7, 16, Rgba([0, 255, 0, 255])),
        sprite_with_block("c", 20, 5, Rgba([0, 0, 255, 128])),
    ];
    let groups = vec![Group::new("loop", vec![sprites[2].id, sprites[0].id])];
    let opts = PackingOptions::builder().trim(true).build();
    let out = pack_sprites(&sprites, &groups, &opts)
        .expect("pack")
        .expect("fits");

    let sheet = unpack_atlas(&out.rgba, &out.atlas).expect("unpack");
    assert_eq!(sheet.sprites.len(), 3);
    for original in &sprites {
        let back = sheet
            .sprites
            .iter()
            .find(|s| s.name == original.name)
            .expect("frame");
        assert_eq!(*back.image, *original.image, "{}", original.name);
        assert_ne!(back.id, original.id);
    }

    assert_eq!(sheet.groups.len(), 1);
    let names: Vec<&str> = sheet.groups[0]
        .member_ids
        .iter()
        .filter_map(|id| sheet.sprites.iter().find(|s| s.id == *id))
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["c", "a"]);
}

#[test]
fn rotated_frames_are_turned_upright() {
    // stored 3x2, upright 2x3
    let mut raster = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
    raster.put_pixel(0, 0, Rgba([1, 0, 0, 255]));
    raster.put_pixel(2, 1, Rgba([2, 0, 0, 255]));
    let v = serde_json::json!({
        "frames": {
            "r": {
                "frame": {"x": 0, "y": 0, "w": 3, "h": 2},
                "rotated": true,
                "spriteSourceSize": {"x": 0, "y": 0, "w": 2, "h": 3},
                "sourceSize": {"w": 2, "h": 3}
            }
        }
    });
    let atlas = from_json_hash(&v).expect("decode");
    let sheet = unpack_atlas(&raster, &atlas).expect("unpack");
    let img = &sheet.sprites[0].image;
    assert_eq!(img.dimensions(), (2, 3));
    assert_eq!(*img.get_pixel(0, 2), Rgba([1, 0, 0, 255]));
    assert_eq!(*img.get_pixel(1, 0), Rgba([2, 0, 0, 255]));
}

#[test]
fn frames_outside_the_raster_are_skipped() {
    let raster = RgbaImage::from_pixel(10, 10, Rgba([3, 3, 3, 255]));
    let v = serde_json::json!({
        "frames": {
            "in": {"frame": {"x": 0, "y": 0, "w": 4, "h": 4}},
            "out": {"frame": {"x": 8, "y": 8, "w": 4, "h": 4}}
        },
        "animations": {"lost": ["out"], "kept": ["out", "in"]}
    });
    let atlas = from_json_hash(&v).expect("decode");
    let sheet = unpack_atlas(&raster, &atlas).expect("unpack");
    assert_eq!(sheet.sprites.len(), 1);
    assert_eq!(sheet.sprites[0].name, "in");
    assert_eq!(sheet.groups.len(), 1);
    assert_eq!(sheet.groups[0].name, "kept");
    assert_eq!(sheet.groups[0].member_ids, vec![sheet.sprites[0].id]);
}

#[test]
fn content_offsets_past_the_source_size_are_skipped() {
    let raster = RgbaImage::from_pixel(8, 8, Rgba([5, 5, 5, 255]));
    let v = serde_json::json!({
        "frames": {
            "far": {
                "frame": {"x": 0, "y": 0, "w": 4, "h": 4},
                "rotated": true,
                "spriteSourceSize": {"x": u32::MAX, "y": 0, "w": 4, "h": 4},
                "sourceSize": {"w": 4, "h": 4}
            },
            "wide": {
                "frame": {"x": 4, "y": 0, "w": 4, "h": 2},
                "spriteSourceSize": {"x": 2, "y": 0, "w": 4, "h": 2},
                "sourceSize": {"w": 4, "h": 2}
            },
            "ok": {
                "frame": {"x": 4, "y": 4, "w": 2, "h": 2},
                "spriteSourceSize": {"x": 1, "y": 1, "w": 2, "h": 2},
                "sourceSize": {"w": 3, "h": 3}
            }
        }
    });
    let atlas = from_json_hash(&v).expect("decode");
    let sheet = unpack_atlas(&raster, &atlas).expect("unpack");
    assert_eq!(sheet.sprites.len(), 1);
    let ok = &sheet.sprites[0];
    assert_eq!(ok.name, "ok");
    assert_eq!(ok.image.dimensions(), (3, 3));
    assert_eq!(ok.image.get_pixel(0, 0)[3], 0);
    assert_eq!(*ok.image.get_pixel(2, 2), Rgba([5, 5, 5, 255]));
}
