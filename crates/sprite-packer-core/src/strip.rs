//! Sprite-strip detection and grid suggestion.
//!
//! These are starting points for a human to confirm or edit; false positives
//! are expected.

use crate::slicer::SliceGrid;
use regex::Regex;
use std::sync::LazyLock;

/// Frame sizes tried when guessing how a strip divides.
pub const CANDIDATE_FRAME_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 96, 128];
/// Upper bound for the frame count of a suggested strip.
pub const MAX_STRIP_FRAMES: u32 = 16;
/// Upper bound for columns/rows of a suggested grid.
pub const MAX_GRID_CELLS: u32 = 8;

static STRIP_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"strip([0-9]+)").expect("valid strip pattern"));

/// Digits after `strip`, saturating counts too large for `u32`.
fn strip_count(name: &str) -> Option<u32> {
    let caps = STRIP_COUNT.captures(name)?;
    Some(caps[1].parse::<u32>().unwrap_or(u32::MAX))
}

fn mentions_strip(filename: Option<&str>) -> bool {
    filename.is_some_and(|f| f.to_ascii_lowercase().contains("strip"))
}

fn is_wide(w: u32, h: u32) -> bool {
    w as u64 > 3 * h as u64
}

fn is_tall(w: u32, h: u32) -> bool {
    3 * (w as u64) < h as u64
}

/// True if the filename mentions "strip" (case-insensitive), the aspect ratio
/// is beyond 3:1 either way, or both sides are multiples of 16, 32 or 64.
pub fn looks_like_strip(width: u32, height: u32, filename: Option<&str>) -> bool {
    if mentions_strip(filename) {
        return true;
    }
    if width == 0 || height == 0 {
        return false;
    }
    is_wide(width, height)
        || is_tall(width, height)
        || [16, 32, 64]
            .iter()
            .any(|m| width % m == 0 && height % m == 0)
}

/// Frame count along `major` using the largest candidate size that divides it
/// evenly while `minor` stays within twice that size. Clamped to
/// `1..=MAX_STRIP_FRAMES`.
fn guess_strip_frames(major: u32, minor: u32) -> u32 {
    CANDIDATE_FRAME_SIZES
        .iter()
        .rev()
        .find(|&&size| major % size == 0 && minor <= size * 2)
        .map(|&size| major / size)
        .unwrap_or(1)
        .clamp(1, MAX_STRIP_FRAMES)
}

fn horizontal_strip(width: u32, height: u32, columns: u32) -> SliceGrid {
    let columns = columns.clamp(1, MAX_STRIP_FRAMES);
    SliceGrid::strip(columns, width / columns, height)
}

/// Proposes a slice grid for an image of `width x height`.
///
/// A `strip<N>` filename wins (N columns, one row). Otherwise wide and tall
/// images become single-row/column strips, and anything else a grid of
/// roughly quarter-size cells.
pub fn suggest_grid(width: u32, height: u32, filename: Option<&str>) -> SliceGrid {
    if let Some(name) = filename.map(str::to_ascii_lowercase) {
        if let Some(n) = strip_count(&name) {
            return horizontal_strip(width, height, n);
        }
        if name.contains("strip") {
            return horizontal_strip(width, height, guess_strip_frames(width, height));
        }
    }

    if width == 0 || height == 0 {
        return SliceGrid::strip(1, width, height);
    }

    if is_wide(width, height) {
        return horizontal_strip(width, height, guess_strip_frames(width, height));
    }
    if is_tall(width, height) {
        let rows = guess_strip_frames(height, width);
        return SliceGrid {
            columns: 1,
            rows,
            frame_width: width,
            frame_height: height / rows,
            ..SliceGrid::strip(1, width, height)
        };
    }

    // square-ish: cells a quarter of the shorter side
    let short = width.min(height) as u64;
    let columns = ((4 * width as u64 / short) as u32).clamp(1, MAX_GRID_CELLS);
    let rows = ((4 * height as u64 / short) as u32).clamp(1, MAX_GRID_CELLS);
    SliceGrid {
        columns,
        rows,
        frame_width: width / columns,
        frame_height: height / rows,
        ..SliceGrid::strip(1, width, height)
    }
}
