//! Pointer gesture state machine.
//!
//! A gesture starts on pointer-down, is advanced by pointer-move and ends on
//! pointer-up (commit) or cancellation (discard). Only one gesture is ever
//! active. The math for a single frame lives in the pure functions
//! [`drag_position`] and [`resized`]; the [`Editor`](super::Editor) owns the
//! state transitions.
//!
//! ```text
//!            down(Element)            up (moved)  -> commit
//!   Idle ──────────────────> Dragging ───────────────────────> Idle
//!     │      down(Handle)             up (still)  -> no commit
//!     ├────────────────────> Resizing
//!     │      down(Canvas)
//!     └────────────────────> Marquee  ── up -> selection only
//! ```

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, Size, snap_opt};
use crate::document::{Element, ElementId};
use crate::error::LabelError;

/// Pointer travel, in millimetres, below which a press counts as a click.
pub const CLICK_EPSILON_MM: f64 = 0.1;

/// Resize handle direction: east (width), south (height) or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    E,
    S,
    Se,
}

impl ResizeHandle {
    pub fn affects_width(&self) -> bool {
        matches!(self, Self::E | Self::Se)
    }

    pub fn affects_height(&self) -> bool {
        matches!(self, Self::S | Self::Se)
    }
}

impl FromStr for ResizeHandle {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "e" => Ok(Self::E),
            "s" => Ok(Self::S),
            "se" => Ok(Self::Se),
            other => Err(LabelError::InvalidArgument(format!("unknown resize handle '{}'", other))),
        }
    }
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift/Ctrl/Cmd: toggle on click, extend on marquee.
    pub additive: bool,
    /// Alt: bypass grid snapping.
    pub precise: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        additive: false,
        precise: false,
    };

    pub fn additive() -> Self {
        Self {
            additive: true,
            ..Self::NONE
        }
    }

    pub fn precise() -> Self {
        Self {
            precise: true,
            ..Self::NONE
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Element(ElementId),
    Handle(ElementId, ResizeHandle),
    Canvas,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        primary: ElementId,
        /// Pointer position at press, canvas pixels.
        start: Point,
        /// Elements as they were when the gesture began.
        origin: Vec<Element>,
        moved: bool,
        /// Element to select alone if the press turns out to be a click.
        collapse_to: Option<ElementId>,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start: Point,
        origin: Vec<Element>,
        original: Size,
        moved: bool,
    },
    Marquee {
        start: Point,
        current: Point,
        additive: bool,
        /// Selection at press time; kept when `additive`.
        base: HashSet<ElementId>,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Marquee rectangle in canvas pixels, while one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self {
            Self::Marquee { start, current, .. } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }
}

/// Whether a pointer delta (millimetres) is past the click threshold.
pub fn exceeds_click_epsilon(delta_mm: Point) -> bool {
    delta_mm.max_abs() > CLICK_EPSILON_MM
}

/// New position of the primary dragged element: clamp at the label origin,
/// then snap when a grid is active.
pub fn drag_position(origin: Point, delta_mm: Point, grid: Option<f64>) -> Point {
    Point::new(
        snap_opt((origin.x + delta_mm.x).max(0.0), grid),
        snap_opt((origin.y + delta_mm.y).max(0.0), grid),
    )
}

/// New size for a resize gesture. Axes not covered by `handle` keep their
/// original value. The result is never below 1mm, even after snapping.
pub fn resized(original: Size, handle: ResizeHandle, delta_mm: Point, grid: Option<f64>) -> Size {
    let grow = |value: f64, delta: f64| snap_opt((value + delta).max(1.0), grid).max(1.0);
    Size::new(
        if handle.affects_width() {
            grow(original.width, delta_mm.x)
        } else {
            original.width
        },
        if handle.affects_height() {
            grow(original.height, delta_mm.y)
        } else {
            original.height
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_clamps_then_snaps() {
        let p = drag_position(Point::new(2.0, 2.0), Point::new(-5.0, 3.4), Some(1.0));
        assert_eq!(p, Point::new(0.0, 5.0));
    }

    #[test]
    fn test_drag_precise_skips_snap() {
        let p = drag_position(Point::new(2.0, 2.0), Point::new(0.3, 0.3), None);
        assert_eq!(p, Point::new(2.3, 2.3));
    }

    #[test]
    fn test_resize_east_only_width() {
        let s = resized(Size::new(10.0, 10.0), ResizeHandle::E, Point::new(4.6, 9.0), Some(1.0));
        assert_eq!(s, Size::new(15.0, 10.0));
    }

    #[test]
    fn test_resize_south_only_height() {
        let s = resized(Size::new(10.0, 10.0), ResizeHandle::S, Point::new(9.0, -2.0), None);
        assert_eq!(s, Size::new(10.0, 8.0));
    }

    #[test]
    fn test_resize_never_below_one() {
        let s = resized(Size::new(10.0, 10.0), ResizeHandle::Se, Point::new(-50.0, -50.0), Some(5.0));
        assert_eq!(s, Size::new(1.0, 1.0));
    }

    #[test]
    fn test_click_epsilon() {
        assert!(!exceeds_click_epsilon(Point::new(0.1, -0.05)));
        assert!(exceeds_click_epsilon(Point::new(0.0, 0.11)));
    }

    #[test]
    fn test_marquee_rect() {
        let g = Gesture::Marquee {
            start: Point::new(10.0, 10.0),
            current: Point::new(2.0, 4.0),
            additive: false,
            base: HashSet::new(),
        };
        assert_eq!(g.marquee_rect(), Some(Rect::new(2.0, 4.0, 8.0, 6.0)));
        assert_eq!(Gesture::Idle.marquee_rect(), None);
    }

    #[test]
    fn test_handle_parse() {
        assert_eq!("SE".parse::<ResizeHandle>().unwrap(), ResizeHandle::Se);
        assert!("nw".parse::<ResizeHandle>().is_err());
    }
}
