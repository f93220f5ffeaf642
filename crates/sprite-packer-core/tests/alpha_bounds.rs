use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use sprite_packer_core::Rect;
use sprite_packer_core::analyze::{
    Classification, classify, is_fully_transparent, is_solid_color, opaque_bounds, scan,
};

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

#[test]
fn bounds_cover_every_visible_pixel() {
    let mut img = RgbaImage::from_pixel(10, 8, CLEAR);
    img.put_pixel(2, 3, RED);
    img.put_pixel(6, 5, BLUE);
    assert_eq!(opaque_bounds(&img), Rect::new(2, 3, 5, 3));
}

#[test]
fn faint_alpha_counts_as_visible() {
    let mut img = RgbaImage::from_pixel(5, 5, CLEAR);
    img.put_pixel(4, 0, Rgba([10, 10, 10, 1]));
    assert_eq!(opaque_bounds(&img), Rect::new(4, 0, 1, 1));
    assert!(!is_fully_transparent(&img));
}

#[test]
fn transparent_image_reports_full_bounds() {
    let img = RgbaImage::from_pixel(7, 5, CLEAR);
    assert_eq!(opaque_bounds(&img), Rect::new(0, 0, 7, 5));
    assert_eq!(scan(&img).bounds, None);
}

#[test]
fn transparent_16x16_classification() {
    let img = RgbaImage::from_pixel(16, 16, CLEAR);
    assert_eq!(
        classify(&img),
        Classification {
            transparent: true,
            solid: false
        }
    );
    assert!(classify(&img).is_empty_or_degenerate());
}

#[test]
fn solid_color_ignores_transparent_pixels() {
    let mut img = RgbaImage::from_pixel(4, 4, CLEAR);
    img.put_pixel(0, 0, RED);
    img.put_pixel(3, 3, RED);
    assert!(is_solid_color(&img));
    assert!(classify(&img).is_empty_or_degenerate());

    img.put_pixel(1, 2, BLUE);
    assert!(!is_solid_color(&img));
    assert!(!classify(&img).is_empty_or_degenerate());
}

#[test]
fn alpha_difference_breaks_solid_color() {
    let mut img = RgbaImage::from_pixel(2, 1, RED);
    img.put_pixel(1, 0, Rgba([255, 0, 0, 128]));
    assert!(!is_solid_color(&img));
}

#[test]
fn fully_opaque_uniform_image_is_solid() {
    let img = RgbaImage::from_pixel(3, 9, BLUE);
    let c = classify(&img);
    assert!(c.solid && !c.transparent);
    assert_eq!(opaque_bounds(&img), Rect::new(0, 0, 3, 9));
}

#[test]
fn transparent_and_solid_are_exclusive() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let palette = [CLEAR, RED, BLUE];
    for _ in 0..200 {
        let w = rng.gen_range(1..=6);
        let h = rng.gen_range(1..=6);
        let mut img = RgbaImage::from_pixel(w, h, CLEAR);
        for px in img.pixels_mut() {
            // mostly transparent so every bucket shows up
            if rng.gen_bool(0.2) {
                *px = palette[rng.gen_range(0..palette.len())];
            }
        }
        let c = classify(&img);
        assert!(!(c.transparent && c.solid), "{w}x{h}: {c:?}");
        assert_eq!(c.transparent, is_fully_transparent(&img));
        assert_eq!(c.solid, is_solid_color(&img));
        if let Some(b) = scan(&img).bounds {
            assert!(Rect::new(0, 0, w, h).contains(&b));
        }
    }
}
