//! Pixel/grid-unit coordinate transforms.
//!
//! Cell sizes derive from the viewport: the width left over after removing
//! the inter-cell margins and the outer padding is split evenly across the
//! columns (rows likewise). An extent of `n` units covers `n` cells plus the
//! `n - 1` margins between them; an offset of `n` units starts after `n`
//! cell+margin strides plus the padding.
//!
//! Every function is pure and does not validate its output. Non-finite
//! inputs (drag previews carry them transiently) pass through unchanged.
//! Rounding is half away from zero in both directions, which makes
//! `px_to_units(units_to_px(u)) == u` for integer `u` whenever a cell is
//! wider than a margin.

use gridboard_core::geometry::{GridPoint, GridRect, PixelRect};
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Width of one column in pixels.
#[must_use]
pub fn grid_col_width(viewport_width: f64, config: &GridConfig) -> f64 {
    cell_size(viewport_width, config.columns, config.margin_px, config.padding_px)
}

/// Height of one row in pixels.
#[must_use]
pub fn grid_row_height(viewport_height: f64, config: &GridConfig) -> f64 {
    cell_size(viewport_height, config.rows, config.margin_px, config.padding_px)
}

fn cell_size(extent_px: f64, cells: u16, margin_px: f64, padding_px: f64) -> f64 {
    let cells = f64::from(cells);
    (extent_px - margin_px * (cells - 1.0) - padding_px * 2.0) / cells
}

/// Pixel extent of `units` cells.
#[must_use]
pub fn units_to_px_size(units: f64, cell_px: f64, margin_px: f64) -> f64 {
    if !units.is_finite() {
        return units;
    }
    (cell_px * units + (units - 1.0).max(0.0) * margin_px).round()
}

/// Pixel offset of the cell at `units`.
#[must_use]
pub fn units_to_px_offset(units: f64, cell_px: f64, margin_px: f64, padding_px: f64) -> f64 {
    if !units.is_finite() {
        return units;
    }
    ((cell_px + margin_px) * units + padding_px).round()
}

/// Units covered by a pixel extent.
#[must_use]
pub fn px_to_units_size(px: f64, cell_px: f64, margin_px: f64) -> f64 {
    if !px.is_finite() {
        return px;
    }
    ((px + margin_px) / (cell_px + margin_px)).round()
}

/// Unit index of a pixel offset.
#[must_use]
pub fn px_to_units_offset(px: f64, cell_px: f64, margin_px: f64, padding_px: f64) -> f64 {
    if !px.is_finite() {
        return px;
    }
    ((px - padding_px) / (cell_px + margin_px)).round()
}

/// Units travelled by a pointer delta.
///
/// One unit of travel is one cell+margin stride.
#[must_use]
pub fn px_delta_to_units(px: f64, cell_px: f64, margin_px: f64) -> f64 {
    if !px.is_finite() {
        return px;
    }
    (px / (cell_px + margin_px)).round()
}

/// Saturating conversion of a rounded unit value. NaN maps to 0.
fn to_unit(value: f64) -> i32 {
    value as i32
}

/// Transform bound to one viewport and grid configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    col_width: f64,
    row_height: f64,
    margin_px: f64,
    padding_px: f64,
}

impl GridTransform {
    #[must_use]
    pub fn new(viewport: Viewport, config: &GridConfig) -> Self {
        Self {
            col_width: grid_col_width(viewport.width, config),
            row_height: grid_row_height(viewport.height, config),
            margin_px: config.margin_px,
            padding_px: config.padding_px,
        }
    }

    #[must_use]
    pub const fn col_width(&self) -> f64 {
        self.col_width
    }

    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Pixel rectangle covered by a grid rectangle.
    #[must_use]
    pub fn rect_to_px(&self, rect: GridRect) -> PixelRect {
        PixelRect::new(
            units_to_px_offset(f64::from(rect.x), self.col_width, self.margin_px, self.padding_px),
            units_to_px_offset(f64::from(rect.y), self.row_height, self.margin_px, self.padding_px),
            units_to_px_size(f64::from(rect.w), self.col_width, self.margin_px),
            units_to_px_size(f64::from(rect.h), self.row_height, self.margin_px),
        )
    }

    /// Grid rectangle nearest to a pixel rectangle.
    #[must_use]
    pub fn px_to_rect(&self, rect: PixelRect) -> GridRect {
        GridRect::new(
            to_unit(px_to_units_offset(rect.x, self.col_width, self.margin_px, self.padding_px)),
            to_unit(px_to_units_offset(rect.y, self.row_height, self.margin_px, self.padding_px)),
            to_unit(px_to_units_size(rect.width, self.col_width, self.margin_px)),
            to_unit(px_to_units_size(rect.height, self.row_height, self.margin_px)),
        )
    }

    /// Top-left pixel of a grid cell.
    #[must_use]
    pub fn point_to_px(&self, point: GridPoint) -> (f64, f64) {
        (
            units_to_px_offset(f64::from(point.x), self.col_width, self.margin_px, self.padding_px),
            units_to_px_offset(f64::from(point.y), self.row_height, self.margin_px, self.padding_px),
        )
    }

    /// Grid cell nearest to a pixel position.
    #[must_use]
    pub fn px_to_point(&self, x: f64, y: f64) -> GridPoint {
        GridPoint::new(
            to_unit(px_to_units_offset(x, self.col_width, self.margin_px, self.padding_px)),
            to_unit(px_to_units_offset(y, self.row_height, self.margin_px, self.padding_px)),
        )
    }

    /// Horizontal pointer delta in columns.
    #[must_use]
    pub fn dx_to_units(&self, dx: f64) -> i32 {
        to_unit(px_delta_to_units(dx, self.col_width, self.margin_px))
    }

    /// Vertical pointer delta in rows.
    #[must_use]
    pub fn dy_to_units(&self, dy: f64) -> i32 {
        to_unit(px_delta_to_units(dy, self.row_height, self.margin_px))
    }
}
