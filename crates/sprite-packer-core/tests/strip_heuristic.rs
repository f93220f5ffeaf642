use sprite_packer_core::strip::MAX_STRIP_FRAMES;
use sprite_packer_core::{looks_like_strip, suggest_grid};

#[test]
fn filename_count_wins() {
    let g = suggest_grid(256, 32, Some("run_strip8.png"));
    assert_eq!((g.columns, g.rows), (8, 1));
    assert_eq!((g.frame_width, g.frame_height), (32, 32));

    let odd = suggest_grid(100, 100, Some("run_strip8.png"));
    assert_eq!((odd.columns, odd.rows), (8, 1));
    assert_eq!((odd.frame_width, odd.frame_height), (12, 100));
}

#[test]
fn filename_match_is_case_insensitive_and_clamped() {
    let g = suggest_grid(400, 10, Some("FX_Strip40.PNG"));
    assert_eq!(g.columns, MAX_STRIP_FRAMES);
    assert_eq!(g.frame_width, 400 / MAX_STRIP_FRAMES);
}

#[test]
fn oversized_filename_count_saturates_to_the_clamp() {
    for name in ["run_strip99999999999.png", "run_strip123456789012345678901234567890.png"] {
        let g = suggest_grid(160, 32, Some(name));
        assert_eq!((g.columns, g.rows), (MAX_STRIP_FRAMES, 1), "{name}");
        assert_eq!(g.frame_width, 160 / MAX_STRIP_FRAMES);
    }
}

#[test]
fn bare_strip_name_guesses_frames() {
    let g = suggest_grid(160, 32, Some("fx_strip.png"));
    assert_eq!((g.columns, g.rows), (5, 1));
    assert_eq!(g.frame_width, 32);
}

#[test]
fn wide_image_uses_largest_dividing_size() {
    let g = suggest_grid(160, 32, None);
    assert_eq!((g.columns, g.rows), (5, 1));
    assert_eq!((g.frame_width, g.frame_height), (32, 32));
}

#[test]
fn tall_image_becomes_a_column() {
    let g = suggest_grid(24, 120, None);
    assert_eq!((g.columns, g.rows), (1, 5));
    assert_eq!((g.frame_width, g.frame_height), (24, 24));
}

#[test]
fn wide_image_without_divisor_is_one_frame() {
    let g = suggest_grid(100, 20, None);
    assert_eq!((g.columns, g.rows), (1, 1));
    assert_eq!(g.frame_width, 100);
}

#[test]
fn square_image_gets_quarter_grid() {
    let g = suggest_grid(64, 64, None);
    assert_eq!((g.columns, g.rows), (4, 4));
    assert_eq!((g.frame_width, g.frame_height), (16, 16));

    let g = suggest_grid(100, 60, None);
    assert_eq!((g.columns, g.rows), (6, 4));
    assert_eq!((g.frame_width, g.frame_height), (16, 15));
}

#[test]
fn zero_sized_image_gives_invalid_grid() {
    assert!(!suggest_grid(0, 10, None).is_valid());
}

#[test]
fn strip_detection() {
    assert!(looks_like_strip(17, 13, Some("Hero_STRIP.png")));
    assert!(looks_like_strip(200, 50, None));
    assert!(looks_like_strip(50, 200, None));
    assert!(looks_like_strip(48, 48, None));
    assert!(looks_like_strip(128, 64, Some("tiles.png")));
    assert!(!looks_like_strip(17, 13, None));
    assert!(!looks_like_strip(30, 20, Some("idle.png")));
    // exactly 3:1 is not beyond the threshold
    assert!(!looks_like_strip(90, 30, None));
}
