//! Grid model: reduced image dimensions plus the ordered per-row segments.

use std::fmt;

/// How a row of active cells is reduced to segments.
///
/// Only one policy exists today. New policies (e.g. one segment per run)
/// are added as variants without changing the [`Segment`] shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SpanPolicy {
    /// One segment per row, from the leftmost to the rightmost active cell.
    /// Inactive cells between two active clusters are covered by the span.
    #[default]
    BoundingInterval,
}

impl SpanPolicy {
    /// Get a human-readable name for the policy.
    pub fn name(&self) -> &'static str {
        match self {
            SpanPolicy::BoundingInterval => "bounding-interval",
        }
    }
}

/// An interval of active cells.
///
/// All bounds are 1-based and inclusive. A segment produced by the row
/// reducer always covers exactly one row, so `y1 == y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

impl Segment {
    /// Create a segment covering columns `x1..=x2` of a single row.
    pub fn row(y: u32, x1: u32, x2: u32) -> Self {
        Self { x1, x2, y1: y, y2: y }
    }

    /// Number of columns covered.
    pub fn width(&self) -> u32 {
        self.x2 - self.x1 + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> u32 {
        self.y2 - self.y1 + 1
    }

    /// Check the bounds against a grid of `cells_x` by `cells_y` cells.
    pub fn fits(&self, cells_x: u32, cells_y: u32) -> bool {
        self.x1 >= 1
            && self.x1 <= self.x2
            && self.x2 <= cells_x
            && self.y1 >= 1
            && self.y1 <= self.y2
            && self.y2 <= cells_y
    }
}

/// The whole reduced image.
///
/// Dimensions are fixed at construction. Segments are kept in insertion
/// order, which is top-to-bottom row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    cells_x: u32,
    cells_y: u32,
    segments: Vec<Segment>,
}

impl GridModel {
    /// Create an empty grid of `cells_x` by `cells_y` cells.
    pub fn new(cells_x: u32, cells_y: u32) -> Self {
        Self {
            cells_x,
            cells_y,
            segments: Vec::new(),
        }
    }

    /// Build a grid from already ordered segments.
    ///
    /// Returns `None` if any segment falls outside the grid or if rows are
    /// not strictly increasing.
    pub fn from_segments(cells_x: u32, cells_y: u32, segments: Vec<Segment>) -> Option<Self> {
        let mut grid = Self::new(cells_x, cells_y);
        for segment in segments {
            if !grid.can_push(&segment) {
                return None;
            }
            grid.segments.push(segment);
        }
        Some(grid)
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        debug_assert!(self.can_push(&segment));
        self.segments.push(segment);
    }

    fn can_push(&self, segment: &Segment) -> bool {
        let after_last = self
            .segments
            .last()
            .map_or(true, |last| segment.y1 > last.y2);
        after_last && segment.fits(self.cells_x, self.cells_y)
    }

    /// Width of the grid in cells.
    pub fn cells_x(&self) -> u32 {
        self.cells_x
    }

    /// Height of the grid in cells.
    pub fn cells_y(&self) -> u32 {
        self.cells_y
    }

    /// Segments in top-to-bottom order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when no row has an active cell.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total number of cells covered by segments.
    pub fn active_cells(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| s.width() as u64 * s.height() as u64)
            .sum()
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::render::render(self))
    }
}
