//! End-to-end editing sessions: pointer gestures, history and persistence
//! driven only through the public `Editor` API.

use labelsmith::document::{Element, ElementId, ElementKind, ElementPatch};
use labelsmith::editor::geometry::Point;
use labelsmith::editor::{Alignment, Editor, MAX_HISTORY, Modifiers, PointerTarget, ResizeHandle};
use labelsmith::printer::PrinterLanguage;
use labelsmith::session::{BackgroundStore, FileStore, SessionStore};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const EMPTY_100X50: &str = r#"{"labelSize":{"name":"100 x 50 mm","width":100,"height":50},"elements":[]}"#;

/// Empty 100 x 50 mm label at 1 px/mm with one box per x position.
fn canvas_with_boxes(xs: &[f64]) -> (Editor, Vec<ElementId>) {
    let mut editor = Editor::in_memory();
    editor.import_template(EMPTY_100X50).unwrap();
    editor.set_zoom(1.0);
    let ids = xs
        .iter()
        .map(|&x| editor.add_element(ElementKind::Box, &ElementPatch::position(x, 0.0)))
        .collect();
    (editor, ids)
}

fn drag(editor: &mut Editor, target: PointerTarget, from: Point, to: Point, modifiers: Modifiers) {
    editor.on_pointer_down(target, from, modifiers);
    editor.on_pointer_move(to, modifiers);
    editor.on_pointer_up(to, modifiers);
}

fn position(editor: &Editor, id: &str) -> (f64, f64) {
    let el = editor.document().get(id).unwrap();
    (el.x(), el.y())
}

#[test]
fn test_drag_at_default_zoom_snaps_to_grid() {
    let (mut editor, ids) = canvas_with_boxes(&[10.0]);
    editor.set_zoom(4.0);

    // 11 px at 4 px/mm is 2.75mm; 7 px is 1.75mm.
    drag(
        &mut editor,
        PointerTarget::Element(ids[0].clone()),
        Point::new(50.0, 10.0),
        Point::new(61.0, 17.0),
        Modifiers::NONE,
    );
    assert_eq!(position(&editor, &ids[0]), (13.0, 2.0));

    editor.undo();
    assert_eq!(position(&editor, &ids[0]), (10.0, 0.0));
    editor.redo();
    assert_eq!(position(&editor, &ids[0]), (13.0, 2.0));
}

#[test]
fn test_drag_never_leaves_the_origin_quadrant() {
    let (mut editor, ids) = canvas_with_boxes(&[3.0]);
    drag(
        &mut editor,
        PointerTarget::Element(ids[0].clone()),
        Point::new(5.0, 5.0),
        Point::new(-40.0, -40.0),
        Modifiers::NONE,
    );
    assert_eq!(position(&editor, &ids[0]), (0.0, 0.0));
}

#[test]
fn test_resize_south_east_snaps_both_axes() {
    let (mut editor, ids) = canvas_with_boxes(&[0.0]);
    editor.set_zoom(4.0);
    drag(
        &mut editor,
        PointerTarget::Handle(ids[0].clone(), ResizeHandle::Se),
        Point::new(80.0, 40.0),
        Point::new(90.8, 47.0),
        Modifiers::NONE,
    );
    let size = editor.document().get(&ids[0]).unwrap().explicit_size().unwrap();
    assert_eq!((size.width, size.height), (23.0, 12.0));
}

#[test]
fn test_resize_east_leaves_height() {
    let (mut editor, ids) = canvas_with_boxes(&[0.0]);
    drag(
        &mut editor,
        PointerTarget::Handle(ids[0].clone(), ResizeHandle::E),
        Point::new(20.0, 5.0),
        Point::new(-100.0, 30.0),
        Modifiers::NONE,
    );
    let size = editor.document().get(&ids[0]).unwrap().explicit_size().unwrap();
    assert_eq!((size.width, size.height), (1.0, 10.0));
}

#[test]
fn test_marquee_then_align_left() {
    let (mut editor, ids) = canvas_with_boxes(&[0.0, 30.0, 60.0]);
    editor.update_element(&ids[2], &ElementPatch::position(60.0, 20.0));

    drag(
        &mut editor,
        PointerTarget::Canvas,
        Point::new(25.0, -5.0),
        Point::new(95.0, 25.0),
        Modifiers::NONE,
    );
    assert_eq!(editor.selection().len(), 2);
    assert!(editor.selection().contains(&ids[1]));
    assert!(editor.selection().contains(&ids[2]));

    editor.align(Alignment::Left);
    assert_eq!(position(&editor, &ids[1]), (30.0, 0.0));
    assert_eq!(position(&editor, &ids[2]), (30.0, 20.0));
    assert_eq!(position(&editor, &ids[0]), (0.0, 0.0));
}

#[test]
fn test_additive_marquee_keeps_previous_selection() {
    let (mut editor, ids) = canvas_with_boxes(&[0.0, 30.0, 60.0]);
    editor.select(&ids[0]);
    drag(
        &mut editor,
        PointerTarget::Canvas,
        Point::new(65.0, 2.0),
        Point::new(70.0, 4.0),
        Modifiers::additive(),
    );
    assert_eq!(editor.selection().len(), 2);
    assert!(editor.selection().contains(&ids[0]));
    assert!(editor.selection().contains(&ids[2]));
}

#[test]
fn test_history_is_capped() {
    let (mut editor, _) = canvas_with_boxes(&[]);
    for i in 0..60 {
        editor.add_element(ElementKind::Text, &ElementPatch::position(f64::from(i), 0.0));
    }
    let mut undos = 0;
    while editor.undo() {
        undos += 1;
    }
    assert_eq!(undos, MAX_HISTORY - 1);
    // The oldest surviving snapshot already holds the first eleven texts.
    assert_eq!(editor.elements().len(), 60 - (MAX_HISTORY - 1));
}

#[test]
fn test_new_commit_discards_redo_branch() {
    let (mut editor, ids) = canvas_with_boxes(&[0.0]);
    editor.select(&ids[0]);
    editor.nudge_selected(5.0, 0.0);
    editor.undo();
    assert!(editor.can_redo());
    editor.nudge_selected(0.0, 5.0);
    assert!(!editor.can_redo());
    assert_eq!(position(&editor, &ids[0]), (0.0, 5.0));
}

#[test]
fn test_failed_import_keeps_document_and_history() {
    let (mut editor, _) = canvas_with_boxes(&[0.0, 10.0]);
    let before = editor.document().clone();
    let cursor = editor.history().cursor();

    assert!(editor.import_template(r#"{"elements":[]}"#).is_err());
    assert!(editor.import_template("not json").is_err());
    assert_eq!(editor.document(), &before);
    assert_eq!(editor.history().cursor(), cursor);
}

#[test]
fn test_export_import_roundtrip_between_editors() {
    let (mut source, ids) = canvas_with_boxes(&[4.0, 12.0]);
    source.update_element(&ids[1], &ElementPatch { width: Some(33.0), ..Default::default() });
    source.add_element(ElementKind::QrCode, &ElementPatch::content("{sku}"));
    let json = source.export_template().unwrap();

    let mut target = Editor::in_memory();
    target.import_template(&json).unwrap();
    assert_eq!(target.document(), source.document());
    assert!(target.selection().is_empty());

    target.undo();
    assert_eq!(target.elements().len(), 4);
}

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let saved_id = {
        let mut editor = Editor::new(FileStore::new(&path));
        editor.apply_preset("100 x 150 mm").unwrap();
        editor.set_variable("{lot}", "L-77");
        editor.set_printer_language(PrinterLanguage::Zpl);
        editor.set_grid_size(0.5);
        editor.add_element(ElementKind::Text, &ElementPatch::content("Lot {lot}"))
    };

    let editor = Editor::new(FileStore::new(&path));
    assert_eq!(editor.label_size().width, 100.0);
    assert_eq!(editor.label_size().height, 150.0);
    assert_eq!(editor.printer_language(), PrinterLanguage::Zpl);
    assert_eq!(editor.grid_size(), 0.5);
    assert_eq!(editor.custom_variables().get("{lot}"), Some("L-77"));
    assert!(editor.document().contains(&saved_id));
    assert!(!editor.can_undo());
    assert!(editor.compile(false).contains("^FDLot L-77^FS"));
}

#[test]
fn test_background_writes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let ids = {
        let store = BackgroundStore::start(FileStore::new(&path)).unwrap();
        let mut editor = Editor::new(store);
        editor.import_template(EMPTY_100X50).unwrap();
        let ids: Vec<_> = (0..20)
            .map(|i| editor.add_element(ElementKind::Box, &ElementPatch::position(f64::from(i), 0.0)))
            .collect();
        editor.undo();
        ids
    };

    let editor = Editor::new(FileStore::new(&path));
    assert_eq!(editor.elements().len(), 19);
    assert!(editor.document().contains(&ids[18]));
    assert!(!editor.document().contains(&ids[19]));
}

#[test]
fn test_corrupt_session_falls_back_to_default_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ definitely not json").unwrap();

    let store = FileStore::new(&path);
    assert!(store.load().is_err());
    let editor = Editor::new(store);
    assert_eq!(editor.elements().len(), 4);
}

fn xs(elements: &[Element]) -> Vec<f64> {
    elements.iter().map(Element::x).collect()
}

proptest! {
    #[test]
    fn test_undo_walks_back_through_every_commit(nudges in prop::collection::vec(-5i32..=5, 1..30)) {
        let (mut editor, ids) = canvas_with_boxes(&[50.0]);
        editor.select(&ids[0]);

        let mut states = vec![xs(editor.elements())];
        for dx in nudges {
            editor.nudge_selected(f64::from(dx), 0.0);
            let now = xs(editor.elements());
            if states.last() != Some(&now) {
                states.push(now);
            }
        }

        for expected in states.iter().rev().skip(1) {
            prop_assert!(editor.undo());
            prop_assert_eq!(&xs(editor.elements()), expected);
        }
        for expected in states.iter().skip(1) {
            prop_assert!(editor.redo());
            prop_assert_eq!(&xs(editor.elements()), expected);
        }
        prop_assert!(!editor.redo());
    }
}
