//! Selection state and marquee hit-testing.
//!
//! The selection is a transient set of element ids. It is never persisted
//! and is cleared whenever the document is reset or loaded.

use std::collections::HashSet;

use super::geometry::{MeasuredSizes, Rect, bounds};
use crate::document::{Element, ElementId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: HashSet<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &HashSet<ElementId> {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with a single element.
    pub fn select_only(&mut self, id: impl Into<ElementId>) {
        self.ids.clear();
        self.ids.insert(id.into());
    }

    pub fn insert(&mut self, id: impl Into<ElementId>) {
        self.ids.insert(id.into());
    }

    /// Add if absent, remove if present (modifier-click).
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Replace the selection with `ids`.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Drop ids that no longer exist in `elements` (after undo/delete).
    pub fn retain_existing(&mut self, elements: &[Element]) {
        let live: HashSet<&str> = elements.iter().map(|e| e.id()).collect();
        self.ids.retain(|id| live.contains(id.as_str()));
    }

    /// Selected elements in z-order.
    pub fn selected<'a>(&self, elements: &'a [Element]) -> Vec<&'a Element> {
        elements.iter().filter(|e| self.contains(e.id())).collect()
    }
}

/// Ids of every element whose bounding box overlaps `marquee_px`.
///
/// The marquee is in canvas pixels; element boxes are scaled from
/// millimetres by `zoom` (pixels per millimetre) before the overlap test.
pub fn marquee_hits(
    elements: &[Element],
    measured: &MeasuredSizes,
    marquee_px: &Rect,
    zoom: f64,
) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| marquee_px.intersects(&bounds(e, measured).scale(zoom)))
        .map(|e| e.id().to_string())
        .collect()
}
