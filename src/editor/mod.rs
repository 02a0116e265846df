//! # Layout Editor
//!
//! [`Editor`] is the interactive session around one [`Document`]: it owns
//! the selection, the undo history, the active pointer gesture and the
//! operator's settings, and persists through a [`SessionStore`].
//!
//! ## Module Structure
//!
//! - [`geometry`]: points, rectangles, snapping, element footprints
//! - [`selection`]: selected ids and marquee hit-testing
//! - [`gesture`]: drag/resize/marquee state and per-frame math
//! - [`align`]: alignment and distribution targets
//! - [`history`]: bounded snapshot history
//!
//! ## Commits
//!
//! Every completed operation that changes the element sequence records one
//! history snapshot and saves the session. Pointer-move frames only touch a
//! working copy; pointer-up commits it, cancellation restores the snapshot
//! taken at pointer-down. A press that never travels past
//! [`CLICK_EPSILON_MM`] commits nothing.
//!
//! ```
//! use labelsmith::editor::{Editor, Modifiers, PointerTarget, geometry::Point};
//! use labelsmith::document::{ElementKind, ElementPatch};
//!
//! let mut editor = Editor::in_memory();
//! editor.set_zoom(1.0);
//! let id = editor.add_element(ElementKind::Box, &ElementPatch::position(0.0, 0.0));
//!
//! editor.on_pointer_down(PointerTarget::Element(id.clone()), Point::new(0.0, 0.0), Modifiers::NONE);
//! editor.on_pointer_move(Point::new(4.2, 3.0), Modifiers::NONE);
//! editor.on_pointer_up(Point::new(4.2, 3.0), Modifiers::NONE);
//! assert_eq!(editor.document().get(&id).unwrap().x(), 4.0);
//!
//! editor.undo();
//! assert_eq!(editor.document().get(&id).unwrap().x(), 0.0);
//! ```

pub mod align;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod selection;

pub use align::{Alignment, Distribution};
pub use gesture::{CLICK_EPSILON_MM, Gesture, Modifiers, PointerTarget, ResizeHandle};
pub use history::{History, MAX_HISTORY};
pub use selection::Selection;

use chrono::Local;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::document::{
    Document, Element, ElementId, ElementKind, ElementPatch, LabelSize, Reorder, Template,
};
use crate::error::LabelError;
use crate::printer::PrinterLanguage;
use crate::printer::config::preset;
use crate::protocol;
use crate::session::{MemoryStore, SessionState, SessionStore};
use crate::variables::VariableMap;

use geometry::{MeasuredSizes, Point, Size};
use gesture::{drag_position, exceeds_click_epsilon, resized};

/// Canvas pixels per millimetre at 100% zoom.
pub const DEFAULT_ZOOM: f64 = 4.0;

pub struct Editor<S: SessionStore = MemoryStore> {
    document: Document,
    selection: Selection,
    history: History<Vec<Element>>,
    gesture: Gesture,
    measured: MeasuredSizes,
    custom_variables: VariableMap,
    printer_lang: PrinterLanguage,
    grid_size: f64,
    zoom: f64,
    store: S,
}

impl Editor<MemoryStore> {
    /// Editor with a fresh in-memory store and the default layout.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: SessionStore> Editor<S> {
    /// Open a session from `store`. A missing or unreadable session falls
    /// back to the default layout.
    pub fn new(store: S) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => {
                info!(elements = state.elements.len(), "restored session");
                state
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(error = %e, "could not load session, starting from default layout");
                SessionState::default()
            }
        };
        let mut editor = Self {
            document: Document::default_layout(),
            selection: Selection::new(),
            history: History::new(Vec::new()),
            gesture: Gesture::Idle,
            measured: MeasuredSizes::new(),
            custom_variables: VariableMap::new(),
            printer_lang: PrinterLanguage::default(),
            grid_size: state.grid_size,
            zoom: DEFAULT_ZOOM,
            store,
        };
        editor.apply_state(state);
        editor
    }

    fn apply_state(&mut self, state: SessionState) {
        let mut document = state.document();
        document.normalize();
        self.history.reset(document.elements.clone());
        self.document = document;
        self.custom_variables = state.custom_variables;
        self.printer_lang = state.printer_lang;
        self.grid_size = state.grid_size;
        self.selection.clear();
        self.gesture = Gesture::Idle;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn elements(&self) -> &[Element] {
        &self.document.elements
    }

    pub fn label_size(&self) -> &LabelSize {
        &self.document.label_size
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn history(&self) -> &History<Vec<Element>> {
        &self.history
    }

    pub fn printer_language(&self) -> PrinterLanguage {
        self.printer_lang
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn measured_sizes(&self) -> &MeasuredSizes {
        &self.measured
    }

    pub fn custom_variables(&self) -> &VariableMap {
        &self.custom_variables
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current persisted representation.
    pub fn session_state(&self) -> SessionState {
        SessionState {
            label_size: self.document.label_size.clone(),
            elements: self.document.elements.clone(),
            custom_variables: self.custom_variables.clone(),
            printer_lang: self.printer_lang,
            grid_size: self.grid_size,
        }
    }

    // ------------------------------------------------------------------
    // Commit and persistence
    // ------------------------------------------------------------------

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.session_state()) {
            warn!(error = %e, "failed to save session");
        }
    }

    fn commit(&mut self, action: &str) {
        self.history.commit(self.document.elements.clone());
        debug!(action, cursor = self.history.cursor(), "history commit");
        self.persist();
    }

    /// Commit only if the elements differ from the current snapshot.
    fn commit_if_changed(&mut self, action: &str) -> bool {
        if self.document.elements == *self.history.current() {
            return false;
        }
        self.commit(action);
        true
    }

    fn grid(&self, modifiers: Modifiers) -> Option<f64> {
        if modifiers.precise || self.grid_size <= 0.0 {
            None
        } else {
            Some(self.grid_size)
        }
    }

    // ------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------

    /// Start a gesture. Any gesture still in progress is cancelled first.
    pub fn on_pointer_down(&mut self, target: PointerTarget, pos: Point, modifiers: Modifiers) {
        if !self.gesture.is_idle() {
            self.cancel_gesture();
        }

        match target {
            PointerTarget::Element(id) => {
                if !self.document.contains(&id) {
                    return;
                }
                let mut collapse_to = None;
                if modifiers.additive {
                    self.selection.toggle(&id);
                    if !self.selection.contains(&id) {
                        return;
                    }
                } else if !self.selection.contains(&id) {
                    self.selection.select_only(id.clone());
                } else if self.selection.len() > 1 {
                    collapse_to = Some(id.clone());
                }
                self.gesture = Gesture::Dragging {
                    primary: id,
                    start: pos,
                    origin: self.document.elements.clone(),
                    moved: false,
                    collapse_to,
                };
            }
            PointerTarget::Handle(id, handle) => {
                let Some(original) = self
                    .document
                    .get(&id)
                    .filter(|e| e.is_resizable())
                    .and_then(Element::explicit_size)
                else {
                    return;
                };
                self.selection.select_only(id.clone());
                self.gesture = Gesture::Resizing {
                    id,
                    handle,
                    start: pos,
                    origin: self.document.elements.clone(),
                    original,
                    moved: false,
                };
            }
            PointerTarget::Canvas => {
                let base = if modifiers.additive {
                    self.selection.ids().clone()
                } else {
                    self.selection.clear();
                    HashSet::new()
                };
                self.gesture = Gesture::Marquee {
                    start: pos,
                    current: pos,
                    additive: modifiers.additive,
                    base,
                };
            }
        }
    }

    /// Advance the active gesture to `pos` (canvas pixels).
    pub fn on_pointer_move(&mut self, pos: Point, modifiers: Modifiers) {
        let grid = self.grid(modifiers);
        let zoom = self.zoom;

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging {
                primary,
                start,
                origin,
                moved,
                ..
            } => {
                let delta = pos.delta_from(*start).scale(1.0 / zoom);
                if !*moved && !exceeds_click_epsilon(delta) {
                    return;
                }
                *moved = true;

                let origins: HashMap<&str, Point> = origin
                    .iter()
                    .map(|e| (e.id(), Point::new(e.x(), e.y())))
                    .collect();
                let Some(&p0) = origins.get(primary.as_str()) else {
                    return;
                };
                let target = drag_position(p0, delta, grid);
                let applied = target.delta_from(p0);

                for el in self.document.elements.iter_mut() {
                    if !self.selection.contains(el.id()) {
                        continue;
                    }
                    if el.id() == primary.as_str() {
                        el.set_position(target.x, target.y);
                    } else if let Some(o) = origins.get(el.id()) {
                        el.set_position(o.x + applied.x, o.y + applied.y);
                    }
                }
            }
            Gesture::Resizing {
                id,
                handle,
                start,
                original,
                moved,
                ..
            } => {
                let delta = pos.delta_from(*start).scale(1.0 / zoom);
                if !*moved && !exceeds_click_epsilon(delta) {
                    return;
                }
                *moved = true;

                let size = resized(*original, *handle, delta, grid);
                if let Some(el) = self.document.elements.iter_mut().find(|e| e.id() == id.as_str()) {
                    el.set_size(size);
                }
            }
            Gesture::Marquee { current, .. } => *current = pos,
        }

        if let (Some(rect), Gesture::Marquee { base, .. }) = (self.gesture.marquee_rect(), &self.gesture) {
            let hits = selection::marquee_hits(&self.document.elements, &self.measured, &rect, zoom);
            self.selection.set(base.iter().cloned().chain(hits));
        }
    }

    /// Finish the active gesture at `pos`, committing if anything moved.
    pub fn on_pointer_up(&mut self, pos: Point, modifiers: Modifiers) {
        self.on_pointer_move(pos, modifiers);

        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging { moved: true, .. } => self.commit("move"),
            Gesture::Dragging {
                moved: false,
                collapse_to: Some(id),
                ..
            } => self.selection.select_only(id),
            Gesture::Resizing { moved: true, .. } => self.commit("resize"),
            Gesture::Marquee { .. } => {
                debug!(selected = self.selection.len(), "marquee selection");
            }
            _ => {}
        }
    }

    /// Abandon the active gesture without committing.
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging { origin, .. } | Gesture::Resizing { origin, .. } => {
                self.document.elements = origin;
                debug!("gesture cancelled");
            }
            Gesture::Marquee { base, .. } => self.selection.set(base),
            Gesture::Idle => {}
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select `id` alone; unknown ids clear the selection.
    pub fn select(&mut self, id: &str) {
        if self.document.contains(id) {
            self.selection.select_only(id);
        } else {
            self.selection.clear();
        }
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.document.ids());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Add an element with editor defaults plus `overrides`; it becomes the
    /// selection.
    pub fn add_element(&mut self, kind: ElementKind, overrides: &ElementPatch) -> ElementId {
        let id = self.document.add_element(kind, overrides);
        self.selection.select_only(id.clone());
        self.commit("add");
        id
    }

    /// Merge `patch` into element `id`. Returns whether the element exists.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> bool {
        if !self.document.update_element(id, patch) {
            return false;
        }
        self.commit_if_changed("update");
        true
    }

    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.document.remove_elements(self.selection.ids());
        self.selection.clear();
        self.commit_if_changed("delete");
    }

    /// Duplicate the selection; the copies become the new selection.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let ids = self.document.duplicate(self.selection.ids());
        self.selection.set(ids.iter().cloned());
        self.commit_if_changed("duplicate");
        ids
    }

    pub fn reorder(&mut self, id: &str, direction: Reorder) {
        self.document.reorder(id, direction);
        self.commit_if_changed("reorder");
    }

    /// Move every selected element by a fixed amount (arrow keys).
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) {
        for el in self.document.elements.iter_mut() {
            if self.selection.contains(el.id()) {
                el.set_position(el.x() + dx, el.y() + dy);
            }
        }
        self.commit_if_changed("nudge");
    }

    fn apply_targets(&mut self, targets: Vec<(ElementId, Point)>, action: &str) {
        if targets.is_empty() {
            return;
        }
        let targets: HashMap<ElementId, Point> = targets.into_iter().collect();
        for el in self.document.elements.iter_mut() {
            if let Some(p) = targets.get(el.id()) {
                el.set_position(p.x, p.y);
            }
        }
        self.commit_if_changed(action);
    }

    pub fn align(&mut self, alignment: Alignment) {
        let targets = align::align_targets(
            &self.selection.selected(&self.document.elements),
            &self.measured,
            &self.document.label_size,
            alignment,
        );
        self.apply_targets(targets, "align");
    }

    /// Distribute the selection; fewer than three elements is a no-op.
    pub fn distribute(&mut self, distribution: Distribution) {
        let targets =
            align::distribute_targets(&self.selection.selected(&self.document.elements), distribution);
        self.apply_targets(targets, "distribute");
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document.elements = snapshot.clone();
        self.selection.retain_existing(&self.document.elements);
        self.persist();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document.elements = snapshot.clone();
        self.selection.retain_existing(&self.document.elements);
        self.persist();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------

    /// Change the label stock. Non-positive sizes are rejected.
    pub fn set_label_size(&mut self, size: LabelSize) -> bool {
        if !self.document.set_label_size(size) {
            return false;
        }
        self.persist();
        true
    }

    /// Change the label stock to a named preset.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), LabelError> {
        let size = preset(name).ok_or_else(|| LabelError::InvalidArgument(format!("unknown preset '{}'", name)))?;
        self.set_label_size(size);
        Ok(())
    }

    /// Back to the default layout with an empty history.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.document = Document::default_layout();
        self.selection.clear();
        self.history.reset(self.document.elements.clone());
        info!("layout reset");
        self.persist();
    }

    /// Replace the whole session (document and settings). History restarts.
    pub fn restore(&mut self, state: SessionState) {
        self.apply_state(state);
        info!(elements = self.document.elements.len(), "session replaced");
        self.persist();
    }

    pub fn export_template(&self) -> Result<String, LabelError> {
        Template::export(&self.document)
    }

    /// Load a template. On error the document is left untouched. An invalid
    /// label size falls back to the default stock.
    pub fn import_template(&mut self, json: &str) -> Result<(), LabelError> {
        let document = Template::import(json)?.into_document();
        self.gesture = Gesture::Idle;
        self.document = document;
        self.selection.clear();
        info!(elements = self.document.elements.len(), "template imported");
        self.commit("import");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom_variables.insert(key, value);
        self.persist();
    }

    pub fn remove_variable(&mut self, key: &str) -> bool {
        let removed = self.custom_variables.remove(key).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    pub fn set_printer_language(&mut self, lang: PrinterLanguage) {
        self.printer_lang = lang;
        self.persist();
    }

    /// Grid for snapping, in millimetres. Zero or less disables snapping.
    pub fn set_grid_size(&mut self, grid: f64) {
        self.grid_size = if grid.is_finite() { grid } else { 0.0 };
        self.persist();
    }

    /// Rendered size of an element, reported by the presentation layer.
    pub fn set_measured_size(&mut self, id: impl Into<ElementId>, size: Size) {
        self.measured.insert(id.into(), size);
    }

    /// Canvas pixels per millimetre. Non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > 0.0 && zoom.is_finite() {
            self.zoom = zoom;
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Seed variables, clock values and custom entries, as used for output.
    pub fn variables(&self) -> VariableMap {
        VariableMap::with_defaults(Local::now(), &self.custom_variables)
    }

    /// Compile the current document for the selected printer language.
    pub fn compile(&self, show_comments: bool) -> String {
        protocol::compile(self.printer_lang, &self.document, &self.variables(), show_comments)
    }

    /// Raw job bytes for the transport.
    pub fn print_payload(&self) -> Vec<u8> {
        let bytes = protocol::payload(self.printer_lang, &self.document, &self.variables());
        info!(lang = %self.printer_lang, bytes = bytes.len(), "print job built");
        bytes
    }
}
