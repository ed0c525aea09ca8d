#![forbid(unsafe_code)]

//! Grid geometry primitives.
//!
//! Dashboard widgets live on an integer grid with the origin at the top-left
//! corner. Right and bottom edges are exclusive, so two widgets whose edges
//! coincide share a border without overlapping.

use serde::{Deserialize, Serialize};

/// Number of columns on the dashboard grid.
pub const GRID_COLUMNS: u32 = 24;

/// Default spacing, in grid units, introduced between separated widgets.
pub const GAP_SIZE: u32 = 1;

/// Visual margin allowance subtracted from the touching threshold.
pub const VISUAL_MARGIN: f64 = 0.5;

/// Upper bound used when estimating free space below a pair of widgets.
pub const VERTICAL_SPACE_CAP: u32 = 10;

/// Position and size of a widget on the grid.
///
/// Serialized as `{ x, y, w, h, minW? }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in grid cells.
    pub w: u32,
    /// Height in grid cells.
    pub h: u32,
    /// Smallest width the widget may be compressed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
}

impl GridLayout {
    /// Create a layout without a minimum width.
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            min_w: None,
        }
    }

    /// Set the minimum width used by boundary compression.
    #[must_use]
    pub const fn with_min_w(mut self, min_w: u32) -> Self {
        self.min_w = Some(min_w);
        self
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Area in grid cells.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Horizontal centre.
    #[inline]
    pub fn center_x(&self) -> f64 {
        f64::from(self.x) + f64::from(self.w) / 2.0
    }

    /// Vertical centre.
    #[inline]
    pub fn center_y(&self) -> f64 {
        f64::from(self.y) + f64::from(self.h) / 2.0
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Copy of this layout moved to `point`, keeping its size.
    #[must_use]
    pub const fn moved_to(&self, point: GridPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
            ..*self
        }
    }

    /// True if the row ranges `[y, bottom)` intersect.
    #[inline]
    pub const fn rows_overlap(&self, other: &GridLayout) -> bool {
        !(self.bottom() <= other.y || other.bottom() <= self.y)
    }

    /// True if the column ranges `[x, right)` intersect.
    #[inline]
    pub const fn columns_overlap(&self, other: &GridLayout) -> bool {
        !(self.right() <= other.x || other.right() <= self.x)
    }

    /// Area of the intersection with another layout, 0 when disjoint.
    ///
    /// Shared edges and corners do not count as overlap.
    pub fn overlap_area(&self, other: &GridLayout) -> u64 {
        let left = self.x.max(other.x);
        let right = self.right().min(other.right());
        let top = self.y.max(other.y);
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            u64::from(right - left) * u64::from(bottom - top)
        } else {
            0
        }
    }

    /// True if the interiors intersect.
    #[inline]
    pub fn overlaps(&self, other: &GridLayout) -> bool {
        self.overlap_area(other) > 0
    }
}

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Absolute distance between two edges, as a float for tolerance checks.
#[inline]
pub fn edge_distance(a: u32, b: u32) -> f64 {
    f64::from(a.abs_diff(b))
}
