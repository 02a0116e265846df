//! Alignment and distribution.
//!
//! Both compute target positions without mutating anything; the editor
//! applies the result to its document and commits one history entry.
//!
//! ## Alignment
//!
//! | Selection | Reference box |
//! |-----------|---------------|
//! | 1 element | the label (`0..labelWidth`, `0..labelHeight`) |
//! | 2+ elements | the selection's own bounding box |
//!
//! ## Distribution
//!
//! Sort by position along the axis, pin the first and last element and
//! space the rest evenly between them. Fewer than three elements is a no-op.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::geometry::{MeasuredSizes, Point, Rect, bounds};
use crate::document::{Element, ElementId, LabelSize};
use crate::error::LabelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distribution {
    #[serde(rename = "distribute-h")]
    Horizontal,
    #[serde(rename = "distribute-v")]
    Vertical,
}

impl FromStr for Alignment {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            other => Err(LabelError::InvalidArgument(format!("unknown alignment '{}'", other))),
        }
    }
}

impl FromStr for Distribution {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distribute-h" | "horizontal" | "h" => Ok(Self::Horizontal),
            "distribute-v" | "vertical" | "v" => Ok(Self::Vertical),
            other => Err(LabelError::InvalidArgument(format!("unknown distribution '{}'", other))),
        }
    }
}

/// Target positions for aligning `selected` (in z-order).
///
/// Positions are clamped to ≥ 0, which only matters when an element is
/// wider or taller than the label.
pub fn align_targets(
    selected: &[&Element],
    measured: &MeasuredSizes,
    label: &LabelSize,
    alignment: Alignment,
) -> Vec<(ElementId, Point)> {
    let boxes: Vec<(ElementId, Rect)> = selected
        .iter()
        .map(|e| (e.id().to_string(), bounds(e, measured)))
        .collect();

    let reference = match boxes.len() {
        0 => return Vec::new(),
        1 => Rect::new(0.0, 0.0, label.width, label.height),
        _ => match Rect::union_all(boxes.iter().map(|(_, r)| *r)) {
            Some(group) => group,
            None => return Vec::new(),
        },
    };

    boxes
        .into_iter()
        .map(|(id, r)| {
            let (x, y) = match alignment {
                Alignment::Left => (reference.x, r.y),
                Alignment::Right => (reference.right() - r.width, r.y),
                Alignment::Center => (reference.x + (reference.width - r.width) / 2.0, r.y),
                Alignment::Top => (r.x, reference.y),
                Alignment::Bottom => (r.x, reference.bottom() - r.height),
                Alignment::Middle => (r.x, reference.y + (reference.height - r.height) / 2.0),
            };
            (id, Point::new(x.max(0.0), y.max(0.0)))
        })
        .collect()
}

/// Target positions for distributing `selected` along an axis. Returns an
/// empty list for fewer than three elements.
pub fn distribute_targets(selected: &[&Element], distribution: Distribution) -> Vec<(ElementId, Point)> {
    let count = selected.len();
    if count <= 2 {
        return Vec::new();
    }

    let axis = |e: &Element| match distribution {
        Distribution::Horizontal => e.x(),
        Distribution::Vertical => e.y(),
    };

    let mut sorted: Vec<&Element> = selected.to_vec();
    sorted.sort_by(|a, b| axis(a).total_cmp(&axis(b)));

    let first = axis(sorted[0]);
    let last = axis(sorted[count - 1]);
    let step = (last - first) / (count - 1) as f64;

    sorted
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let pos = if i == 0 {
                first
            } else if i == count - 1 {
                last
            } else {
                first + step * i as f64
            };
            let target = match distribution {
                Distribution::Horizontal => Point::new(pos, e.y()),
                Distribution::Vertical => Point::new(e.x(), pos),
            };
            (e.id().to_string(), target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BoxShape;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::Box(BoxShape {
            id: id.into(),
            x,
            y,
            width: w,
            height: h,
            ..Default::default()
        })
    }

    fn label() -> LabelSize {
        LabelSize::new("t", 100.0, 50.0)
    }

    fn xs(targets: &[(ElementId, Point)]) -> Vec<f64> {
        targets.iter().map(|(_, p)| p.x).collect()
    }

    #[test]
    fn test_single_aligns_to_label() {
        let a = rect("a", 20.0, 5.0, 10.0, 10.0);
        let m = MeasuredSizes::new();
        assert_eq!(xs(&align_targets(&[&a], &m, &label(), Alignment::Left)), [0.0]);
        assert_eq!(xs(&align_targets(&[&a], &m, &label(), Alignment::Right)), [90.0]);
        assert_eq!(xs(&align_targets(&[&a], &m, &label(), Alignment::Center)), [45.0]);

        let middle = align_targets(&[&a], &m, &label(), Alignment::Middle);
        assert_eq!(middle[0].1, Point::new(20.0, 20.0));
        let bottom = align_targets(&[&a], &m, &label(), Alignment::Bottom);
        assert_eq!(bottom[0].1.y, 40.0);
    }

    #[test]
    fn test_group_left_and_center() {
        let a = rect("a", 0.0, 0.0, 10.0, 5.0);
        let b = rect("b", 20.0, 10.0, 10.0, 5.0);
        let m = MeasuredSizes::new();
        assert_eq!(xs(&align_targets(&[&a, &b], &m, &label(), Alignment::Left)), [0.0, 0.0]);
        // Group spans 0..30, so center is 15 and not the label's 50
        assert_eq!(xs(&align_targets(&[&a, &b], &m, &label(), Alignment::Center)), [10.0, 10.0]);
        assert_eq!(xs(&align_targets(&[&a, &b], &m, &label(), Alignment::Right)), [20.0, 20.0]);
    }

    #[test]
    fn test_group_top_bottom() {
        let a = rect("a", 0.0, 2.0, 10.0, 5.0);
        let b = rect("b", 20.0, 10.0, 10.0, 8.0);
        let m = MeasuredSizes::new();
        let top = align_targets(&[&a, &b], &m, &label(), Alignment::Top);
        assert_eq!((top[0].1.y, top[1].1.y), (2.0, 2.0));
        let bottom = align_targets(&[&a, &b], &m, &label(), Alignment::Bottom);
        assert_eq!((bottom[0].1.y, bottom[1].1.y), (13.0, 10.0));
    }

    #[test]
    fn test_unmeasured_text_has_zero_size() {
        use crate::document::Text;
        let t = Element::Text(Text { id: "t".into(), x: 3.0, ..Default::default() });
        let targets = align_targets(&[&t], &MeasuredSizes::new(), &label(), Alignment::Right);
        assert_eq!(targets[0].1.x, 100.0);
    }

    #[test]
    fn test_oversized_clamps_to_zero() {
        let a = rect("a", 0.0, 0.0, 120.0, 10.0);
        let targets = align_targets(&[&a], &MeasuredSizes::new(), &label(), Alignment::Center);
        assert_eq!(targets[0].1.x, 0.0);
    }

    #[test]
    fn test_distribute_three() {
        let a = rect("a", 0.0, 0.0, 1.0, 1.0);
        let b = rect("b", 5.0, 0.0, 1.0, 1.0);
        let c = rect("c", 30.0, 0.0, 1.0, 1.0);
        let targets = distribute_targets(&[&c, &a, &b], Distribution::Horizontal);
        let ids: Vec<&str> = targets.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(xs(&targets), [0.0, 15.0, 30.0]);
    }

    #[test]
    fn test_distribute_vertical_keeps_x() {
        let a = rect("a", 1.0, 0.0, 1.0, 1.0);
        let b = rect("b", 2.0, 1.0, 1.0, 1.0);
        let c = rect("c", 3.0, 2.0, 1.0, 1.0);
        let d = rect("d", 4.0, 12.0, 1.0, 1.0);
        let targets = distribute_targets(&[&a, &b, &c, &d], Distribution::Vertical);
        let ys: Vec<f64> = targets.iter().map(|(_, p)| p.y).collect();
        assert_eq!(ys, [0.0, 4.0, 8.0, 12.0]);
        assert_eq!(xs(&targets), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_distribute_two_is_noop() {
        let a = rect("a", 0.0, 0.0, 1.0, 1.0);
        let b = rect("b", 9.0, 0.0, 1.0, 1.0);
        assert!(distribute_targets(&[&a, &b], Distribution::Horizontal).is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!("distribute-h".parse::<Distribution>().unwrap(), Distribution::Horizontal);
        assert_eq!("Middle".parse::<Alignment>().unwrap(), Alignment::Middle);
    }
}
