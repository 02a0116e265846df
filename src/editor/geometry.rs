//! Geometry primitives for the editor: points, sizes, rectangles, grid
//! snapping and element footprints.
//!
//! Millimetres are canonical. The only pixel-space operation is marquee
//! hit-testing, which happens in canvas pixels to match what the operator
//! dragged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::document::{Element, ElementId};

/// Rendered sizes of elements, keyed by id, reported by the presentation
/// layer. Text elements have no stored size and depend on this entirely.
pub type MeasuredSizes = HashMap<ElementId, Size>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.x.abs().max(self.y.abs())
    }

    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
        let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict box overlap: touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn scale(&self, factor: f64) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Smallest rectangle containing all of `rects`.
    pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc, r| {
            Some(match acc {
                None => r,
                Some(a) => {
                    let x = a.x.min(r.x);
                    let y = a.y.min(r.y);
                    let right = a.right().max(r.right());
                    let bottom = a.bottom().max(r.bottom());
                    Rect::new(x, y, right - x, bottom - y)
                }
            })
        })
    }
}

/// Snap `value` to the nearest multiple of `grid`. A non-positive grid
/// leaves the value unchanged.
pub fn snap(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 || !grid.is_finite() {
        return value;
    }
    (value / grid).round() * grid
}

/// Snap only when a grid is active.
pub fn snap_opt(value: f64, grid: Option<f64>) -> f64 {
    match grid {
        Some(g) => snap(value, g),
        None => value,
    }
}

/// Footprint used for alignment and marquee math: the measured size if the
/// presentation layer reported one, else the stored width/height, else zero.
pub fn footprint(element: &Element, measured: &MeasuredSizes) -> Size {
    measured
        .get(element.id())
        .copied()
        .or_else(|| element.explicit_size())
        .unwrap_or_default()
}

/// Bounding box of an element in millimetres.
pub fn bounds(element: &Element, measured: &MeasuredSizes) -> Rect {
    let size = footprint(element, measured);
    Rect::new(element.x(), element.y(), size.width, size.height)
}
