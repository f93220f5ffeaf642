use crate::compositing::{alloc_surface, blit_rgba};
use crate::error::Result;
use crate::model::{Group, Rect, Sprite};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Above this many candidate cells, per-cell classification before slicing
/// should be something the user opts into.
pub const EXPENSIVE_PREVIEW_CELLS: u32 = 400;

/// Grid partition of a strip image.
///
/// Cell `(row, col)` reads the source rectangle
/// `(margin + col*(frame_width+spacing), margin + row*(frame_height+spacing),
/// frame_width, frame_height)` and is drawn at `(padding_x, padding_y)` in a
/// frame of `frame_width + 2*padding_x` by `frame_height + 2*padding_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceGrid {
    pub columns: u32,
    pub rows: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub padding_x: u32,
    #[serde(default)]
    pub padding_y: u32,
}

/// One candidate cell of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceCell {
    pub row: u32,
    pub column: u32,
    /// Source rectangle in the strip.
    pub rect: Rect,
    /// False when the rectangle leaves the image; such cells are not sliced.
    pub in_bounds: bool,
}

impl SliceGrid {
    /// Single-row grid of `columns` frames with no spacing, margin or padding.
    pub fn strip(columns: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            columns,
            rows: 1,
            frame_width,
            frame_height,
            spacing: 0,
            margin: 0,
            padding_x: 0,
            padding_y: 0,
        }
    }

    /// Columns, rows and frame size are all at least 1.
    pub fn is_valid(&self) -> bool {
        self.columns >= 1 && self.rows >= 1 && self.frame_width >= 1 && self.frame_height >= 1
    }

    pub fn candidate_count(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    pub fn is_expensive_to_preview(&self) -> bool {
        self.candidate_count() > EXPENSIVE_PREVIEW_CELLS
    }

    /// Output frame size including padding.
    pub fn output_size(&self) -> (u32, u32) {
        (
            self.frame_width
                .saturating_add(self.padding_x.saturating_mul(2)),
            self.frame_height
                .saturating_add(self.padding_y.saturating_mul(2)),
        )
    }

    /// Recomputes frame size so `columns x rows` cells fill the image after
    /// margins and spacing. Used after columns/rows are edited.
    pub fn fit_frame_size(&mut self, image_width: u32, image_height: u32) {
        let fit = |extent: u32, n: u32| {
            let n = n.max(1);
            extent
                .saturating_sub(self.margin.saturating_mul(2))
                .saturating_sub((n - 1).saturating_mul(self.spacing))
                / n
        };
        self.frame_width = fit(image_width, self.columns);
        self.frame_height = fit(image_height, self.rows);
    }

    /// Every candidate cell in row-major order.
    pub fn cells(&self, image_width: u32, image_height: u32) -> Vec<SliceCell> {
        let mut out = Vec::with_capacity(self.candidate_count().min(EXPENSIVE_PREVIEW_CELLS) as usize);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let x = self.margin as u64
                    + column as u64 * (self.frame_width as u64 + self.spacing as u64);
                let y = self.margin as u64
                    + row as u64 * (self.frame_height as u64 + self.spacing as u64);
                let in_bounds = x + self.frame_width as u64 <= image_width as u64
                    && y + self.frame_height as u64 <= image_height as u64;
                let rect = Rect::new(
                    x.min(u32::MAX as u64) as u32,
                    y.min(u32::MAX as u64) as u32,
                    self.frame_width,
                    self.frame_height,
                );
                out.push(SliceCell {
                    row,
                    column,
                    rect,
                    in_bounds,
                });
            }
        }
        out
    }
}

/// Cuts `image` into frames named `{base_name}_{NN}`.
///
/// Cells outside the image are skipped. `NN` counts emitted frames from 1
/// (two digits minimum), so after a skip the suffix no longer matches the
/// grid position. An invalid grid yields no frames.
#[instrument(skip_all, fields(columns = grid.columns, rows = grid.rows))]
pub fn slice_strip(image: &RgbaImage, grid: &SliceGrid, base_name: &str) -> Result<Vec<Sprite>> {
    if !grid.is_valid() {
        debug!("invalid slice grid, no frames");
        return Ok(Vec::new());
    }
    let (iw, ih) = image.dimensions();
    let (out_w, out_h) = grid.output_size();
    let mut frames = Vec::new();
    for cell in grid.cells(iw, ih) {
        if !cell.in_bounds {
            continue;
        }
        let mut canvas = alloc_surface(out_w, out_h)?;
        blit_rgba(image, &mut canvas, grid.padding_x, grid.padding_y, cell.rect);
        let name = format!("{}_{:02}", base_name, frames.len() + 1);
        frames.push(Sprite::new(name, canvas));
    }
    debug!(
        frames = frames.len(),
        skipped = grid.candidate_count() as usize - frames.len(),
        "strip sliced"
    );
    Ok(frames)
}

/// Slices `image` and returns the frames together with a group listing them
/// in order.
pub fn slice_strip_as_group(
    image: &RgbaImage,
    grid: &SliceGrid,
    base_name: &str,
    group_name: &str,
) -> Result<(Vec<Sprite>, Group)> {
    let frames = slice_strip(image, grid, base_name)?;
    let group = Group::new(group_name, frames.iter().map(|f| f.id).collect());
    Ok((frames, group))
}
