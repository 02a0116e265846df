//! # Printer Protocol Compilers
//!
//! This module turns a label [`Document`] into a print job for one of three
//! printer languages. Every compiler is a pure function of the document and
//! a [`VariableMap`]; nothing is cached between calls.
//!
//! ## Module Structure
//!
//! - [`qr`]: QR version/cell-size estimation shared by all backends
//! - [`tspl`]: TSC/Godex label printers (text)
//! - [`zpl`]: Zebra label printers (text)
//! - [`escpos`]: receipt printers in page mode (binary, shown as hex)
//!
//! ## Usage Example
//!
//! ```
//! use labelsmith::document::{Document, Element, LabelSize, Text};
//! use labelsmith::printer::PrinterLanguage;
//! use labelsmith::protocol;
//! use labelsmith::variables::VariableMap;
//!
//! let doc = Document {
//!     label_size: LabelSize::new("50 x 30 mm", 50.0, 30.0),
//!     elements: vec![Element::Text(Text { x: 2.0, y: 2.0, ..Text::new("HELLO") })],
//! };
//! let job = protocol::compile(PrinterLanguage::Tspl, &doc, &VariableMap::new(), false);
//! assert!(job.contains(r#"TEXT 16,16,"0",0,1,1,"HELLO""#));
//!
//! let err = protocol::compile_named("epl", &doc, &VariableMap::new(), false);
//! assert_eq!(err, "ERROR: Unsupported printer language 'epl'");
//! ```
//!
//! ## Units
//!
//! Coordinates convert from millimetres with `round(mm * 8)`: every
//! backend assumes 203 DPI.

pub mod escpos;
pub mod qr;
pub mod tspl;
pub mod zpl;

use tracing::debug;

use crate::document::Document;
use crate::printer::PrinterLanguage;
use crate::variables::VariableMap;

/// Compile `doc` for `lang`. ESC/POS is rendered as hex; `show_comments`
/// adds per-command descriptions to it and is ignored by TSPL and ZPL.
pub fn compile(lang: PrinterLanguage, doc: &Document, vars: &VariableMap, show_comments: bool) -> String {
    debug!(%lang, elements = doc.elements.len(), "compiling label");
    match lang {
        PrinterLanguage::Tspl => tspl::compile(doc, vars),
        PrinterLanguage::Zpl => zpl::compile(doc, vars),
        PrinterLanguage::EscPos => escpos::compile(doc, vars, show_comments),
    }
}

/// Like [`compile`], for a language given by name. Unknown names produce an
/// `ERROR: ...` marker string instead of a job.
pub fn compile_named(name: &str, doc: &Document, vars: &VariableMap, show_comments: bool) -> String {
    match name.parse::<PrinterLanguage>() {
        Ok(lang) => compile(lang, doc, vars, show_comments),
        Err(e) => format!("ERROR: {}", e),
    }
}

/// Bytes to send to the printer: TSPL/ZPL text as-is, ESC/POS raw.
pub fn payload(lang: PrinterLanguage, doc: &Document, vars: &VariableMap) -> Vec<u8> {
    if lang.is_binary() {
        escpos::compile_bytes(doc, vars)
    } else {
        compile(lang, doc, vars, false).into_bytes()
    }
}
