//! # TSPL Encoder
//!
//! TSPL is the line-oriented command language of TSC and Godex label
//! printers. A job is plain ASCII, one command per line.
//!
//! ## Job Layout
//!
//! | Command | Meaning |
//! |---------|---------|
//! | `SIZE w mm,h mm` | Label stock size |
//! | `GAP 2 mm,0 mm` | Gap between labels, no offset |
//! | `DIRECTION 1` | Print orientation |
//! | `CLS` | Clear the image buffer |
//! | ...elements... | One or two commands per element |
//! | `PRINT 1,1` | One set, one copy |
//! | `EOP` | End of program |
//!
//! ## Element Commands
//!
//! All coordinates are printer dots (8 per mm).
//!
//! ```text
//! TEXT x,y,"font",rotation,x-mul,y-mul,"content"
//! BARCODE x,y,"128",height,human-readable,rotation,narrow,wide,"content"
//! QRCODE x,y,ecc,cell,mode,rotation,"content"
//! BOX x1,y1,x2,y2,thickness
//! ```
//!
//! TSPL has no bold attribute for the built-in fonts; bold text is struck a
//! second time one dot to the right. A literal `"` inside a string argument
//! is written as `\["]`.

use crate::document::{Barcode, BoxShape, Document, Element, LabelSize, QrCode, Text};
use crate::printer::fonts::{size_multiplier, tspl_font};
use crate::printer::mm_to_dots;
use crate::variables::VariableMap;

use super::qr::QrLayout;

/// Gap between labels, in millimetres.
pub const GAP_MM: f64 = 2.0;

/// Border thickness drawn around QR codes, in dots.
pub const QR_BORDER_DOTS: i64 = 2;

/// Escape a string argument.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\[\"]"))
}

/// `SIZE` command.
pub fn size(label: &LabelSize) -> String {
    format!("SIZE {} mm,{} mm", label.width, label.height)
}

/// `GAP` command.
pub fn gap() -> String {
    format!("GAP {} mm,0 mm", GAP_MM)
}

/// `TEXT` command(s) for one text element. Two lines when bold.
pub fn text(t: &Text, content: &str) -> Vec<String> {
    let x = mm_to_dots(t.x);
    let y = mm_to_dots(t.y);
    let font = tspl_font(&t.font_family);
    let mul = size_multiplier(t.font_size);
    let quoted = quote(content);

    let strike = |x: i64| format!("TEXT {},{},{},0,{},{},{}", x, y, quote(font), mul, mul, quoted);
    let mut lines = vec![strike(x)];
    if t.is_bold() {
        lines.push(strike(x + 1));
    }
    lines
}

/// Code 128 `BARCODE` command with human-readable text below.
pub fn barcode(b: &Barcode, content: &str) -> String {
    format!(
        "BARCODE {},{},\"128\",{},1,0,2,2,{}",
        mm_to_dots(b.x),
        mm_to_dots(b.y),
        mm_to_dots(b.height),
        quote(content)
    )
}

/// `QRCODE` command, preceded by a `BOX` border when enabled.
pub fn qrcode(q: &QrCode, content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if q.show_border {
        lines.push(rect(q.x, q.y, q.width, q.height, QR_BORDER_DOTS));
    }
    let layout = QrLayout::new(q, content, None);
    let (x, y) = layout.position();
    lines.push(format!("QRCODE {},{},L,{},A,0,{}", x, y, layout.cell, quote(content)));
    lines
}

/// `BOX` command for a box element.
pub fn box_shape(b: &BoxShape) -> String {
    rect(b.x, b.y, b.width, b.height, mm_to_dots(b.stroke_width).max(1))
}

fn rect(x: f64, y: f64, width: f64, height: f64, thickness: i64) -> String {
    format!(
        "BOX {},{},{},{},{}",
        mm_to_dots(x),
        mm_to_dots(y),
        mm_to_dots(x + width),
        mm_to_dots(y + height),
        thickness
    )
}

/// Commands for one element, content resolved against `vars`.
pub fn element(el: &Element, vars: &VariableMap) -> Vec<String> {
    match el {
        Element::Text(t) => text(t, &vars.resolve(&t.content)),
        Element::Barcode(b) => vec![barcode(b, &vars.resolve(&b.content))],
        Element::QrCode(q) => qrcode(q, &vars.resolve(&q.content)),
        Element::Box(b) => vec![box_shape(b)],
    }
}

/// Full TSPL job for `doc`, newline-terminated.
pub fn compile(doc: &Document, vars: &VariableMap) -> String {
    let mut lines = vec![size(&doc.label_size), gap(), "DIRECTION 1".to_string(), "CLS".to_string()];
    for el in &doc.elements {
        lines.extend(element(el, vars));
    }
    lines.push("PRINT 1,1".to_string());
    lines.push("EOP".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
