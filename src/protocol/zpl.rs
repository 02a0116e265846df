//! # ZPL Encoder
//!
//! ZPL II is the caret-prefixed command language of Zebra printers. Every
//! element is a field: `^FO` sets its origin, a field command draws it and
//! `^FS` closes it.
//!
//! ## Job Layout
//!
//! ```text
//! ^XA              start of format
//! ^PW<dots>        print width
//! ^MMT             tear-off mode
//! ...fields...
//! ^XZ              end of format
//! ```
//!
//! ## Field Commands
//!
//! | Element | Commands |
//! |---------|----------|
//! | Text | `^FOx,y^A0N,h,h^FD..^FS` (scalable font 0, height in dots) |
//! | Barcode | `^FOx,y^BY2^BCN,h,Y,N,N^FD..^FS` (Code 128, HRI below) |
//! | Box | `^FOx,y^GBw,h,t^FS` |
//! | QR | `^FOx,y^BQN,2,m^FDLA,..^FS` (model 2, ECC L, automatic mode) |
//!
//! QR magnification `m` is limited to 10 by the firmware. Bold text is
//! struck twice, one dot apart.
//!
//! Field data holding `^`, `~` or `_` is written after `^FH` with those
//! characters as `_XX` hex escapes, so resolved content cannot end a field
//! early. Other data is written as-is.

use crate::document::{Barcode, BoxShape, Document, Element, QrCode, Text};
use crate::printer::config::points_to_dots;
use crate::printer::mm_to_dots;
use crate::variables::VariableMap;

use super::qr::QrLayout;

/// Largest `^BQ` magnification.
pub const MAX_QR_MAGNIFICATION: i64 = 10;

/// Border thickness drawn around QR codes, in dots.
pub const QR_BORDER_DOTS: i64 = 2;

/// Hex escape indicator used after `^FH`.
const HEX_INDICATOR: char = '_';

fn field_origin(x: i64, y: i64) -> String {
    format!("^FO{},{}", x, y)
}

/// `^FD` with `data`, escaped under `^FH` when it holds control characters.
fn field_data(data: &str) -> String {
    let special = |c: char| c == '^' || c == '~' || c == HEX_INDICATOR;
    if !data.contains(special) {
        return format!("^FD{}", data);
    }
    let mut out = String::from("^FH^FD");
    for c in data.chars() {
        if special(c) {
            out.push_str(&format!("{}{:02X}", HEX_INDICATOR, u32::from(c)));
        } else {
            out.push(c);
        }
    }
    out
}

/// Text field(s). Two when bold.
pub fn text(t: &Text, content: &str) -> Vec<String> {
    let x = mm_to_dots(t.x);
    let y = mm_to_dots(t.y);
    let h = points_to_dots(t.font_size);

    let strike = |x: i64| format!("{}^A0N,{},{}{}^FS", field_origin(x, y), h, h, field_data(content));
    let mut fields = vec![strike(x)];
    if t.is_bold() {
        fields.push(strike(x + 1));
    }
    fields
}

/// Code 128 field.
pub fn barcode(b: &Barcode, content: &str) -> String {
    format!(
        "{}^BY2^BCN,{},Y,N,N{}^FS",
        field_origin(mm_to_dots(b.x), mm_to_dots(b.y)),
        mm_to_dots(b.height),
        field_data(content)
    )
}

fn graphic_box(x: f64, y: f64, width: f64, height: f64, thickness: i64) -> String {
    format!(
        "{}^GB{},{},{}^FS",
        field_origin(mm_to_dots(x), mm_to_dots(y)),
        mm_to_dots(width),
        mm_to_dots(height),
        thickness
    )
}

/// Box outline field.
pub fn box_shape(b: &BoxShape) -> String {
    graphic_box(b.x, b.y, b.width, b.height, mm_to_dots(b.stroke_width).max(1))
}

/// QR field, preceded by a border box when enabled.
pub fn qrcode(q: &QrCode, content: &str) -> Vec<String> {
    let mut fields = Vec::new();
    if q.show_border {
        fields.push(graphic_box(q.x, q.y, q.width, q.height, QR_BORDER_DOTS));
    }
    let layout = QrLayout::new(q, content, Some(MAX_QR_MAGNIFICATION));
    let (x, y) = layout.position();
    fields.push(format!(
        "{}^BQN,2,{}{}^FS",
        field_origin(x, y),
        layout.cell,
        field_data(&format!("LA,{}", content))
    ));
    fields
}

/// Fields for one element, content resolved against `vars`.
pub fn element(el: &Element, vars: &VariableMap) -> Vec<String> {
    match el {
        Element::Text(t) => text(t, &vars.resolve(&t.content)),
        Element::Barcode(b) => vec![barcode(b, &vars.resolve(&b.content))],
        Element::QrCode(q) => qrcode(q, &vars.resolve(&q.content)),
        Element::Box(b) => vec![box_shape(b)],
    }
}

/// Full ZPL format for `doc`, one command group per line.
pub fn compile(doc: &Document, vars: &VariableMap) -> String {
    let mut lines = vec![
        "^XA".to_string(),
        format!("^PW{}", mm_to_dots(doc.label_size.width)),
        "^MMT".to_string(),
    ];
    for el in &doc.elements {
        lines.extend(element(el, vars));
    }
    lines.push("^XZ".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
