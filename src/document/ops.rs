//! Pure operations over element sequences.
//!
//! Each function takes the current sequence by reference and returns a new
//! one, so the history can keep whole sequences as immutable snapshots.
//! Unknown ids are silently ignored: the result equals the input.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use super::types::{Element, ElementId, new_element_id};
use crate::error::LabelError;

/// Direction for a z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reorder {
    /// Move to the end of the sequence (top-most).
    Front,
    /// Move to the start of the sequence (back-most).
    Back,
    /// Swap with the next element.
    Up,
    /// Swap with the previous element.
    Down,
}

impl FromStr for Reorder {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "up" | "forward" => Ok(Self::Up),
            "down" | "backward" => Ok(Self::Down),
            other => Err(LabelError::InvalidArgument(format!(
                "unknown reorder direction '{}'",
                other
            ))),
        }
    }
}

/// Position of `id` in the sequence.
pub fn index_of(elements: &[Element], id: &str) -> Option<usize> {
    elements.iter().position(|e| e.id() == id)
}

/// Sequence with `element` appended (top of z-order).
pub fn appended(elements: &[Element], element: Element) -> Vec<Element> {
    let mut out = elements.to_vec();
    out.push(element);
    out
}

/// Sequence with every element whose id is in `ids` removed. Survivors keep
/// their relative order.
pub fn without(elements: &[Element], ids: &HashSet<ElementId>) -> Vec<Element> {
    elements
        .iter()
        .filter(|e| !ids.contains(e.id()))
        .cloned()
        .collect()
}

/// Sequence with one element moved in z-order. No-op for unknown ids and at
/// the boundary (`up` on the top element, `down` on the bottom one).
pub fn reordered(elements: &[Element], id: &str, direction: Reorder) -> Vec<Element> {
    let mut out = elements.to_vec();
    let Some(idx) = index_of(&out, id) else {
        return out;
    };

    match direction {
        Reorder::Front => {
            let el = out.remove(idx);
            out.push(el);
        }
        Reorder::Back => {
            let el = out.remove(idx);
            out.insert(0, el);
        }
        Reorder::Up => {
            if idx + 1 < out.len() {
                out.swap(idx, idx + 1);
            }
        }
        Reorder::Down => {
            if idx > 0 {
                out.swap(idx, idx - 1);
            }
        }
    }
    out
}

/// Copies of the elements in `ids` (in sequence order) with fresh ids,
/// offset by `(dx, dy)` millimetres.
pub fn duplicates(elements: &[Element], ids: &HashSet<ElementId>, dx: f64, dy: f64) -> Vec<Element> {
    elements
        .iter()
        .filter(|e| ids.contains(e.id()))
        .map(|e| {
            let mut copy = e.clone();
            copy.set_id(new_element_id());
            copy.set_position(e.x() + dx, e.y() + dy);
            copy
        })
        .collect()
}
