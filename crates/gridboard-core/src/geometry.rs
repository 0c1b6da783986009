#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Grid geometry is expressed in integer grid units (columns and rows). The
//! fields are signed so that raw pointer-derived input can be represented
//! before it is normalized; every rectangle stored in a layout has a
//! non-negative origin.

use serde::{Deserialize, Serialize};

/// A rectangle in grid units.
///
/// `x`/`y` are column/row offsets from the top-left of the canvas, `w`/`h`
/// are column/row spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Left column (inclusive).
    pub x: i32,
    /// Top row (inclusive).
    pub y: i32,
    /// Width in columns.
    pub w: i32,
    /// Height in rows.
    pub h: i32,
}

impl GridRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_parts(origin: GridPoint, size: GridSize) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Column/row spans.
    #[inline]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.w, self.h)
    }

    /// Check if the rectangle spans no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict overlap test.
    ///
    /// Two rectangles intersect only if their spans overlap on both axes.
    /// Rectangles that merely share an edge do not intersect. A zero-width or
    /// zero-height rectangle strictly inside another one does.
    #[inline]
    pub const fn intersects(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Clamp every field to be non-negative.
    ///
    /// No minimum extent is enforced: a zero-width or zero-height rectangle
    /// survives normalization.
    #[inline]
    pub const fn normalized(self) -> Self {
        Self {
            x: clamp_non_negative(self.x),
            y: clamp_non_negative(self.y),
            w: clamp_non_negative(self.w),
            h: clamp_non_negative(self.h),
        }
    }

    /// Same size, moved to `origin`.
    #[inline]
    pub const fn with_origin(self, origin: GridPoint) -> Self {
        Self::new(origin.x, origin.y, self.w, self.h)
    }
}

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates to be non-negative.
    #[inline]
    pub const fn normalized(self) -> Self {
        Self::new(clamp_non_negative(self.x), clamp_non_negative(self.y))
    }
}

/// A column/row span pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub w: i32,
    pub h: i32,
}

impl GridSize {
    #[inline]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Clamp both spans to be non-negative.
    #[inline]
    pub const fn normalized(self) -> Self {
        Self::new(clamp_non_negative(self.w), clamp_non_negative(self.h))
    }
}

/// A rectangle in pixel space.
///
/// Components are floating point because drag previews may carry
/// non-finite placeholders while a gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[inline]
const fn clamp_non_negative(value: i32) -> i32 {
    if value < 0 { 0 } else { value }
}
