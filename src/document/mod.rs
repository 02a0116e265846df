//! # Label Document Model
//!
//! A label is a [`LabelSize`] plus an ordered sequence of [`Element`]s.
//! Sequence order is z-order: index 0 is drawn first (back-most).
//!
//! ```
//! use labelsmith::document::*;
//!
//! let mut doc = Document::new(LabelSize::new("50 x 30 mm", 50.0, 30.0));
//! let id = doc.add_element(ElementKind::Text, &ElementPatch::content("HELLO"));
//! doc.update_element(&id, &ElementPatch::position(2.0, 2.0));
//! assert_eq!(doc.get(&id).unwrap().x(), 2.0);
//!
//! // Unknown ids are a silent no-op
//! doc.update_element("missing", &ElementPatch::position(9.0, 9.0));
//! assert_eq!(doc.elements.len(), 1);
//! ```
//!
//! Every operation is total. Mutators replace `elements` with the result of
//! a pure function from [`ops`], which keeps whole-sequence snapshots cheap
//! to reason about for the history.

pub mod ops;
pub mod template;
pub mod types;

pub use ops::Reorder;
pub use template::Template;
pub use types::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::printer::config::{DEFAULT_PRESET, preset};

/// Offset applied to duplicated elements, in millimetres.
pub const DUPLICATE_OFFSET_MM: f64 = 5.0;

/// A label layout: size plus z-ordered elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub label_size: LabelSize,
    pub elements: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::default_layout()
    }
}

impl Document {
    /// Empty document of the given size.
    pub fn new(label_size: LabelSize) -> Self {
        Self {
            label_size,
            elements: Vec::new(),
        }
    }

    /// Built-in starter layout on the default 50 x 30 mm stock: a company
    /// line, a product line, a SKU barcode and a QR code.
    pub fn default_layout() -> Self {
        let label_size = preset(DEFAULT_PRESET).unwrap_or_else(|| LabelSize::new(DEFAULT_PRESET, 50.0, 30.0));
        let mut doc = Self::new(label_size);
        doc.add_element(
            ElementKind::Text,
            &ElementPatch {
                x: Some(2.0),
                y: Some(2.0),
                content: Some("{company}".into()),
                font_size: Some(14.0),
                font_weight: Some(FontWeight::Bold),
                ..Default::default()
            },
        );
        doc.add_element(
            ElementKind::Text,
            &ElementPatch {
                x: Some(2.0),
                y: Some(8.0),
                content: Some("{product} {price}".into()),
                ..Default::default()
            },
        );
        doc.add_element(
            ElementKind::Barcode,
            &ElementPatch {
                x: Some(2.0),
                y: Some(15.0),
                content: Some("{sku}".into()),
                width: Some(28.0),
                height: Some(10.0),
                ..Default::default()
            },
        );
        doc.add_element(
            ElementKind::QrCode,
            &ElementPatch {
                x: Some(33.0),
                y: Some(13.0),
                content: Some("{sku}".into()),
                ..Default::default()
            },
        );
        doc
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids in z-order.
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id().to_string()).collect()
    }

    /// Append a new element with the variant's editor defaults, then apply
    /// `overrides`. Returns the new id.
    pub fn add_element(&mut self, kind: ElementKind, overrides: &ElementPatch) -> ElementId {
        let mut element = kind.editor_default();
        element.set_id(new_element_id());
        overrides.apply(&mut element);
        let id = element.id().to_string();
        self.elements = ops::appended(&self.elements, element);
        id
    }

    /// Merge `patch` into the element with `id`. Returns whether it exists;
    /// an absent id leaves the document untouched.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> bool {
        match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => {
                patch.apply(element);
                true
            }
            None => false,
        }
    }

    /// Remove every element whose id is in `ids`, preserving the relative
    /// order of the rest. Unknown ids are ignored.
    pub fn remove_elements(&mut self, ids: &HashSet<ElementId>) {
        self.elements = ops::without(&self.elements, ids);
    }

    /// Move one element within the z-order.
    pub fn reorder(&mut self, id: &str, direction: Reorder) {
        self.elements = ops::reordered(&self.elements, id, direction);
    }

    /// Append copies of `ids` offset by [`DUPLICATE_OFFSET_MM`]. Returns the
    /// new ids in sequence order.
    pub fn duplicate(&mut self, ids: &HashSet<ElementId>) -> Vec<ElementId> {
        let copies = ops::duplicates(&self.elements, ids, DUPLICATE_OFFSET_MM, DUPLICATE_OFFSET_MM);
        let new_ids = copies.iter().map(|e| e.id().to_string()).collect();
        self.elements.extend(copies);
        new_ids
    }

    /// Replace the label size. Non-positive dimensions are rejected and the
    /// current size is kept; returns whether the size changed.
    pub fn set_label_size(&mut self, size: LabelSize) -> bool {
        if !size.is_valid() {
            return false;
        }
        self.label_size = size;
        true
    }

    /// Repair a document read from outside: an invalid label size becomes
    /// the default stock, and empty or repeated ids get fresh ones. The
    /// first element holding an id keeps it.
    pub fn normalize(&mut self) {
        if !self.label_size.is_valid() {
            warn!(
                width = self.label_size.width,
                height = self.label_size.height,
                "invalid label size, using default"
            );
            self.label_size = Self::default_layout().label_size;
        }

        let mut seen = HashSet::new();
        for element in &mut self.elements {
            if element.id().is_empty() || !seen.insert(element.id().to_string()) {
                let id = new_element_id();
                seen.insert(id.clone());
                element.set_id(id);
            }
        }
    }
}
