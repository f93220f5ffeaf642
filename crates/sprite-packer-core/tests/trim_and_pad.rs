use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use sprite_packer_core::analyze::opaque_bounds;
use sprite_packer_core::compositing::{alloc_surface, blit_rgba};
use sprite_packer_core::{Rect, Sprite, pad_sprite, trim_sprite};

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);

fn with_block(w: u32, h: u32, block: Rect) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(w, h, CLEAR);
    for y in block.y..block.y2() {
        for x in block.x..block.x2() {
            img.put_pixel(x, y, GREEN);
        }
    }
    img
}

#[test]
fn trim_crops_to_opaque_bounds() {
    let sprite = Sprite::new("hero", with_block(12, 10, Rect::new(3, 2, 4, 5)));
    let (trimmed, rec) = trim_sprite(&sprite, 0).expect("trim");
    assert_eq!((trimmed.width(), trimmed.height()), (4, 5));
    assert_eq!((rec.offset_x, rec.offset_y), (3, 2));
    assert_eq!((rec.trimmed_width, rec.trimmed_height), (4, 5));
    assert_eq!((rec.original_width, rec.original_height), (12, 10));
    assert_eq!(rec.region, Rect::new(3, 2, 4, 5));
    assert!(rec.is_cropped());
    assert_eq!(trimmed.id, sprite.id);
    assert_eq!(trimmed.name, "hero");
    assert!(trimmed.image.pixels().all(|p| *p == GREEN));
}

#[test]
fn trim_padding_is_clamped_to_image() {
    let sprite = Sprite::new("s", with_block(6, 6, Rect::new(1, 1, 2, 2)));
    let (trimmed, rec) = trim_sprite(&sprite, 2).expect("trim");
    assert_eq!(rec.region, Rect::new(0, 0, 5, 5));
    assert_eq!(rec.opaque_bounds(), Rect::new(1, 1, 2, 2));
    assert_eq!((trimmed.width(), trimmed.height()), (5, 5));
    assert_eq!(*trimmed.image.get_pixel(1, 1), GREEN);

    let (_, full) = trim_sprite(&sprite, 4).expect("trim");
    assert_eq!(full.region, Rect::new(0, 0, 6, 6));
    assert!(!full.is_cropped());
}

#[test]
fn trim_of_transparent_sprite_keeps_full_size() {
    let sprite = Sprite::new("empty", RgbaImage::from_pixel(8, 3, CLEAR));
    let (trimmed, rec) = trim_sprite(&sprite, 0).expect("trim");
    assert_eq!((trimmed.width(), trimmed.height()), (8, 3));
    assert!(!rec.is_cropped());
}

#[test]
fn re_embedding_restores_opaque_bounds() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let w = rng.gen_range(1..=24);
        let h = rng.gen_range(1..=24);
        let bx = rng.gen_range(0..w);
        let by = rng.gen_range(0..h);
        let bw = rng.gen_range(1..=w - bx);
        let bh = rng.gen_range(1..=h - by);
        let block = Rect::new(bx, by, bw, bh);
        let sprite = Sprite::new("r", with_block(w, h, block));

        let (trimmed, rec) = trim_sprite(&sprite, 0).expect("trim");
        assert!(rec.trimmed_width <= rec.original_width);
        assert!(rec.trimmed_height <= rec.original_height);

        let mut canvas = alloc_surface(rec.original_width, rec.original_height).expect("surface");
        blit_rgba(
            &trimmed.image,
            &mut canvas,
            rec.offset_x,
            rec.offset_y,
            Rect::new(0, 0, trimmed.width(), trimmed.height()),
        );
        assert_eq!(opaque_bounds(&canvas), block);
        assert_eq!(opaque_bounds(&canvas), opaque_bounds(&sprite.image));
    }
}

#[test]
fn pad_adds_transparent_border() {
    let sprite = Sprite::new("p", RgbaImage::from_pixel(3, 2, GREEN));
    let padded = pad_sprite(&sprite, 2, 1).expect("pad");
    assert_eq!((padded.width(), padded.height()), (7, 4));
    assert_eq!(padded.id, sprite.id);
    assert_eq!(*padded.image.get_pixel(0, 0), CLEAR);
    assert_eq!(*padded.image.get_pixel(2, 1), GREEN);
    assert_eq!(*padded.image.get_pixel(4, 2), GREEN);
    assert_eq!(*padded.image.get_pixel(5, 2), CLEAR);
    assert_eq!(opaque_bounds(&padded.image), Rect::new(2, 1, 3, 2));
}

#[test]
fn source_pixels_are_never_touched() {
    let img = with_block(5, 5, Rect::new(1, 1, 3, 3));
    let sprite = Sprite::new("keep", img.clone());
    let _ = trim_sprite(&sprite, 1).expect("trim");
    let _ = pad_sprite(&sprite, 4, 4).expect("pad");
    assert_eq!(*sprite.image, img);
}
