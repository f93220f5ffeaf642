//! Layout strategies.
//!
//! Each strategy is a pure function from item sizes (already inflated by
//! spacing) to placements keyed by item index. A strategy that cannot place
//! every item returns fewer placements; the atlas builder treats that as
//! "does not fit".

use crate::config::Layout;
use crate::model::{Placement, Size};
use crate::packer::{pack_all, tree::TreePacker};

impl Layout {
    /// Runs this strategy.
    ///
    /// - `bin`: current search bin, used by `Compact`.
    /// - `max`: caller's upper bounds, used by the shelf strategies.
    /// - `rows`: item indices per group row, used by `ByGroup` only.
    pub fn arrange(self, items: &[Size], rows: &[Vec<usize>], bin: Size, max: Size) -> Vec<Placement> {
        match self {
            Layout::Compact => compact(items, bin),
            Layout::Horizontal => horizontal(items, max),
            Layout::Vertical => vertical(items, max),
            Layout::ByGroup => by_group(items, rows, max),
        }
    }
}

pub fn compact(items: &[Size], bin: Size) -> Vec<Placement> {
    let mut packer = TreePacker::new(bin.w, bin.h);
    pack_all(&mut packer, items)
}

/// Rows left to right, wrapping when the next item would pass `max.w`.
/// Stops at the first item that would pass `max.h`.
pub fn horizontal(items: &[Size], max: Size) -> Vec<Placement> {
    let mut out = Vec::with_capacity(items.len());
    let (mut x, mut y, mut row_h) = (0u32, 0u32, 0u32);
    for (i, s) in items.iter().enumerate() {
        if x > 0 && x + s.w > max.w {
            x = 0;
            y += row_h;
            row_h = 0;
        }
        if s.w > max.w || y + s.h > max.h {
            break;
        }
        out.push(Placement {
            key: i,
            x,
            y,
            w: s.w,
            h: s.h,
        });
        x += s.w;
        row_h = row_h.max(s.h);
    }
    out
}

/// Columns top to bottom; the transpose of `horizontal`.
pub fn vertical(items: &[Size], max: Size) -> Vec<Placement> {
    let transposed: Vec<Size> = items.iter().map(|s| Size::new(s.h, s.w)).collect();
    horizontal(&transposed, Size::new(max.h, max.w))
        .into_iter()
        .map(|p| Placement {
            key: p.key,
            x: p.y,
            y: p.x,
            w: p.h,
            h: p.w,
        })
        .collect()
}

/// One row per entry of `rows`, as tall as its tallest member. Members that
/// would pass `max.w` are dropped from their row, not reflowed. Stops at the
/// first row that would pass `max.h`.
pub fn by_group(items: &[Size], rows: &[Vec<usize>], max: Size) -> Vec<Placement> {
    let mut out = Vec::with_capacity(items.len());
    let mut y = 0u32;
    for row in rows {
        let row_h = row.iter().map(|&i| items[i].h).max().unwrap_or(0);
        if row_h == 0 {
            continue;
        }
        if y + row_h > max.h {
            break;
        }
        let mut x = 0u32;
        for &i in row {
            let s = items[i];
            if x + s.w > max.w {
                continue;
            }
            out.push(Placement {
                key: i,
                x,
                y,
                w: s.w,
                h: s.h,
            });
            x += s.w;
        }
        y += row_h;
    }
    out
}
