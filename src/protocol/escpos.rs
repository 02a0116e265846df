//! # ESC/POS Page-Mode Encoder
//!
//! Generic receipt printers have no label language, but ESC/POS page mode
//! allows absolute positioning inside a fixed print area. Each element is
//! placed with an explicit Y/X pair and drawn with the matching command
//! group; the page is printed with `FF` and the paper is cut.
//!
//! ## Protocol Details
//!
//! | Command | Hex | Description |
//! |---------|-----|-------------|
//! | ESC @ | `1B 40` | Initialize |
//! | ESC L | `1B 4C` | Select page mode |
//! | ESC W | `1B 57 xL xH yL yH dxL dxH dyL dyH` | Print area (origin 0,0) |
//! | GS $ | `1D 24 nL nH` | Absolute vertical position |
//! | ESC $ | `1B 24 nL nH` | Absolute horizontal position |
//! | ESC M | `1B 4D n` | Font A (0) or Font B (1) |
//! | ESC E | `1B 45 n` | Emphasis on (1) / off (0) |
//! | LF | `0A` | Print line |
//! | GS h | `1D 68 n` | Barcode height in dots |
//! | GS w | `1D 77 n` | Barcode module width |
//! | GS k | `1D 6B 49 n {B data` | Code 128, code set B |
//! | FF | `0C` | Print page |
//! | GS V | `1D 56 00` | Full cut |
//!
//! ## QR Sub-commands (GS ( k)
//!
//! | Function | Hex |
//! |----------|-----|
//! | Model 2 | `1D 28 6B 04 00 31 41 32 00` |
//! | Cell size | `1D 28 6B 03 00 31 43 n` |
//! | ECC level L | `1D 28 6B 03 00 31 45 30` |
//! | Store data | `1D 28 6B pL pH 31 50 30 data` (p = len + 3) |
//! | Print | `1D 28 6B 03 00 31 51 30` |
//!
//! All 16-bit values are little-endian. Page mode has no rule-drawing
//! command, so box elements and QR borders are not printed.
//!
//! ## Output Forms
//!
//! [`compile_bytes`] returns the raw job for a transport. [`compile`]
//! renders it as uppercase hex pairs; with comments enabled every command
//! is on its own line followed by `// description`.

use crate::document::{Barcode, Document, Element, LabelSize, QrCode, Text};
use crate::printer::mm_to_dots;
use crate::variables::VariableMap;

use super::qr::QrLayout;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const ESC: u8 = 0x1B;
pub const GS: u8 = 0x1D;
pub const LF: u8 = 0x0A;
pub const FF: u8 = 0x0C;

/// Texts below this point size use the smaller Font B.
pub const FONT_B_BELOW_PT: f64 = 10.0;

/// Code 128 module width in dots.
pub const BARCODE_MODULE_WIDTH: u8 = 2;

/// Longest Code 128 payload a single `GS k` length byte can carry
/// (length byte counts the two code-set bytes).
pub const MAX_BARCODE_DATA: usize = 253;

/// Longest QR payload a `GS ( k` length field can carry (the field counts
/// `cn`, `fn` and `m` as well).
pub const MAX_QR_DATA: usize = u16::MAX as usize - 3;

/// One encoded command with a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub bytes: Vec<u8>,
    pub label: String,
}

impl Command {
    pub fn new(bytes: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            bytes,
            label: label.into(),
        }
    }

    /// Description only; contributes no bytes.
    pub fn note(label: impl Into<String>) -> Self {
        Self::new(Vec::new(), label)
    }
}

fn le16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

fn dots_u16(mm: f64) -> u16 {
    mm_to_dots(mm).clamp(0, i64::from(u16::MAX)) as u16
}

// ============================================================================
// COMMAND BUILDERS
// ============================================================================

/// # Initialize (ESC @)
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Page Mode (ESC L)
pub fn page_mode() -> Vec<u8> {
    vec![ESC, b'L']
}

/// # Set Print Area (ESC W)
///
/// Origin is fixed at (0, 0); `width` and `height` are in dots.
pub fn print_area(width: u16, height: u16) -> Vec<u8> {
    let mut cmd = vec![ESC, b'W', 0x00, 0x00, 0x00, 0x00];
    cmd.extend(le16(width));
    cmd.extend(le16(height));
    cmd
}

/// # Absolute Vertical Position (GS $)
pub fn vertical_position(y: u16) -> Vec<u8> {
    let [lo, hi] = le16(y);
    vec![GS, b'$', lo, hi]
}

/// # Absolute Horizontal Position (ESC $)
pub fn horizontal_position(x: u16) -> Vec<u8> {
    let [lo, hi] = le16(x);
    vec![ESC, b'$', lo, hi]
}

/// # Select Font (ESC M)
pub fn select_font(font_b: bool) -> Vec<u8> {
    vec![ESC, b'M', u8::from(font_b)]
}

/// # Emphasis (ESC E)
pub fn emphasis(on: bool) -> Vec<u8> {
    vec![ESC, b'E', u8::from(on)]
}

/// ASCII payload; anything outside printable ASCII becomes `?`.
pub fn ascii(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect()
}

/// # Print Page (FF)
pub fn form_feed() -> Vec<u8> {
    vec![FF]
}

/// # Full Cut (GS V 0)
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0x00]
}

/// QR code commands (GS ( k, cn = 49).
pub mod qr {
    use super::{GS, MAX_QR_DATA, le16};

    fn function(fn_code: u8, params: &[u8]) -> Vec<u8> {
        let len = (params.len() + 2).min(usize::from(u16::MAX)) as u16;
        let mut cmd = vec![GS, b'(', b'k'];
        cmd.extend(le16(len));
        cmd.push(0x31);
        cmd.push(fn_code);
        cmd.extend(params);
        cmd
    }

    /// Function 165: select model 2.
    pub fn model2() -> Vec<u8> {
        function(0x41, &[0x32, 0x00])
    }

    /// Function 167: module size in dots.
    pub fn cell_size(n: u8) -> Vec<u8> {
        function(0x43, &[n])
    }

    /// Function 169: error correction level L.
    pub fn error_correction_l() -> Vec<u8> {
        function(0x45, &[0x30])
    }

    /// Function 180: store symbol data. Length field is `data.len() + 3`;
    /// data past [`MAX_QR_DATA`] bytes is dropped.
    pub fn store(data: &[u8]) -> Vec<u8> {
        let data = &data[..data.len().min(MAX_QR_DATA)];
        let mut params = Vec::with_capacity(data.len() + 1);
        params.push(0x30);
        params.extend(data);
        function(0x50, &params)
    }

    /// Function 181: print the stored symbol.
    pub fn print() -> Vec<u8> {
        function(0x51, &[0x30])
    }
}

/// Code 128 commands.
pub mod code128 {
    use super::{GS, MAX_BARCODE_DATA};

    /// # Barcode Height (GS h)
    pub fn height(dots: u8) -> Vec<u8> {
        vec![GS, b'h', dots.max(1)]
    }

    /// # Module Width (GS w)
    pub fn module_width(n: u8) -> Vec<u8> {
        vec![GS, b'w', n]
    }

    /// # Print Code 128 (GS k 73), code set B
    ///
    /// Data past [`MAX_BARCODE_DATA`] bytes is dropped.
    pub fn print(data: &[u8]) -> Vec<u8> {
        let data = &data[..data.len().min(MAX_BARCODE_DATA)];
        let mut cmd = vec![GS, b'k', 0x49, (data.len() + 2) as u8, b'{', b'B'];
        cmd.extend(data);
        cmd
    }
}

// ============================================================================
// ELEMENTS
// ============================================================================

fn position(x: u16, y: u16) -> [Command; 2] {
    [
        Command::new(vertical_position(y), format!("Set Y position {}", y)),
        Command::new(horizontal_position(x), format!("Set X position {}", x)),
    ]
}

pub fn text(t: &Text, content: &str) -> Vec<Command> {
    let font_b = t.font_size < FONT_B_BELOW_PT;
    let bold = t.is_bold();
    let mut cmds = position(dots_u16(t.x), dots_u16(t.y)).to_vec();
    cmds.push(Command::new(select_font(font_b), if font_b { "Font B" } else { "Font A" }));
    cmds.push(Command::new(emphasis(bold), if bold { "Bold on" } else { "Bold off" }));
    cmds.push(Command::new(ascii(content), format!("Text \"{}\"", content)));
    cmds.push(Command::new(vec![LF], "Line feed"));
    cmds
}

pub fn qrcode(q: &QrCode, content: &str) -> Vec<Command> {
    let layout = QrLayout::new(q, content, None);
    let (x, y) = layout.position();
    let clamp = |v: i64| v.clamp(0, i64::from(u16::MAX)) as u16;
    let cell = layout.cell.clamp(1, i64::from(u8::MAX)) as u8;

    let mut cmds = position(clamp(x), clamp(y)).to_vec();
    cmds.push(Command::new(qr::model2(), "QR model 2"));
    cmds.push(Command::new(qr::cell_size(cell), format!("QR cell size {}", cell)));
    cmds.push(Command::new(qr::error_correction_l(), "QR error correction L"));
    cmds.push(Command::new(
        qr::store(content.as_bytes()),
        format!("QR store {} bytes", content.len().min(MAX_QR_DATA)),
    ));
    cmds.push(Command::new(qr::print(), "QR print"));
    cmds
}

pub fn barcode(b: &Barcode, content: &str) -> Vec<Command> {
    let height = mm_to_dots(b.height).clamp(1, i64::from(u8::MAX)) as u8;
    let mut cmds = position(dots_u16(b.x), dots_u16(b.y)).to_vec();
    cmds.push(Command::new(code128::height(height), format!("Barcode height {}", height)));
    cmds.push(Command::new(
        code128::module_width(BARCODE_MODULE_WIDTH),
        format!("Barcode module width {}", BARCODE_MODULE_WIDTH),
    ));
    cmds.push(Command::new(
        code128::print(&ascii(content)),
        format!("Code 128 \"{}\"", content),
    ));
    cmds
}

/// Commands for one element, content resolved against `vars`.
pub fn element(el: &Element, vars: &VariableMap) -> Vec<Command> {
    match el {
        Element::Text(t) => text(t, &vars.resolve(&t.content)),
        Element::QrCode(q) => qrcode(q, &vars.resolve(&q.content)),
        Element::Barcode(b) => barcode(b, &vars.resolve(&b.content)),
        Element::Box(_) => vec![Command::note("Box skipped (no page-mode rule command)")],
    }
}

fn header(label: &LabelSize) -> Vec<Command> {
    let (w, h) = (dots_u16(label.width), dots_u16(label.height));
    vec![
        Command::new(init(), "Initialize printer"),
        Command::new(page_mode(), "Select page mode"),
        Command::new(print_area(w, h), format!("Print area {}x{} dots", w, h)),
    ]
}

/// Every command of the job, in order.
pub fn commands(doc: &Document, vars: &VariableMap) -> Vec<Command> {
    let mut cmds = header(&doc.label_size);
    for el in &doc.elements {
        cmds.extend(element(el, vars));
    }
    cmds.push(Command::new(form_feed(), "Print page"));
    cmds.push(Command::new(cut_full(), "Full cut"));
    cmds
}

/// Raw job bytes.
pub fn compile_bytes(doc: &Document, vars: &VariableMap) -> Vec<u8> {
    commands(doc, vars).into_iter().flat_map(|c| c.bytes).collect()
}

/// Uppercase space-separated hex pairs.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hex rendering of the job. Without comments the whole job is one line;
/// with comments there is one line per command.
pub fn compile(doc: &Document, vars: &VariableMap, show_comments: bool) -> String {
    let cmds = commands(doc, vars);
    if !show_comments {
        return hex(&cmds.into_iter().flat_map(|c| c.bytes).collect::<Vec<_>>());
    }
    cmds.iter()
        .map(|c| {
            if c.bytes.is_empty() {
                format!("// {}", c.label)
            } else {
                format!("{} // {}", hex(&c.bytes), c.label)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BoxShape, FontWeight};

    #[test]
    fn test_print_area_little_endian() {
        assert_eq!(print_area(400, 240), vec![0x1B, 0x57, 0, 0, 0, 0, 0x90, 0x01, 0xF0, 0x00]);
    }

    #[test]
    fn test_positions() {
        assert_eq!(vertical_position(0x0110), vec![0x1D, 0x24, 0x10, 0x01]);
        assert_eq!(horizontal_position(16), vec![0x1B, 0x24, 0x10, 0x00]);
    }

    #[test]
    fn test_qr_subcommands() {
        assert_eq!(qr::model2(), vec![0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);
        assert_eq!(qr::cell_size(4), vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x04]);
        assert_eq!(qr::error_correction_l(), vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x30]);
        assert_eq!(qr::print(), vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);
    }

    #[test]
    fn test_qr_store_length_is_len_plus_three() {
        let cmd = qr::store(b"ABCDE");
        assert_eq!(&cmd[..8], &[0x1D, 0x28, 0x6B, 0x08, 0x00, 0x31, 0x50, 0x30]);
        assert_eq!(&cmd[8..], b"ABCDE");
    }

    #[test]
    fn test_qr_store_truncates_to_length_field() {
        let cmd = qr::store(&vec![b'x'; 70_000]);
        let declared = usize::from(u16::from_le_bytes([cmd[3], cmd[4]]));
        assert_eq!(declared, usize::from(u16::MAX));
        assert_eq!(cmd.len() - 5, declared);
        assert_eq!(cmd.len(), 5 + 3 + MAX_QR_DATA);
    }

    #[test]
    fn test_oversized_qr_keeps_stream_aligned() {
        let q = QrCode {
            id: "q".into(),
            ..Default::default()
        };
        let cmds = qrcode(&q, &"x".repeat(70_000));
        assert_eq!(cmds[5].label, format!("QR store {} bytes", MAX_QR_DATA));
        assert_eq!(cmds[6].bytes, qr::print());
    }

    #[test]
    fn test_code128_print() {
        assert_eq!(code128::print(b"12"), vec![0x1D, 0x6B, 0x49, 0x04, 0x7B, 0x42, b'1', b'2']);
        let long = vec![b'x'; 400];
        assert_eq!(code128::print(&long)[3], 255);
    }

    #[test]
    fn test_ascii_replaces_non_ascii() {
        assert_eq!(ascii("a€b"), b"a?b".to_vec());
    }

    #[test]
    fn test_text_sequence() {
        let t = Text {
            id: "t".into(),
            x: 2.0,
            y: 2.0,
            font_weight: FontWeight::Bold,
            ..Default::default()
        };
        let bytes: Vec<u8> = text(&t, "HI").into_iter().flat_map(|c| c.bytes).collect();
        assert_eq!(hex(&bytes), "1D 24 10 00 1B 24 10 00 1B 4D 00 1B 45 01 48 49 0A");
    }

    #[test]
    fn test_small_text_uses_font_b() {
        let t = Text {
            id: "t".into(),
            font_size: 8.0,
            ..Default::default()
        };
        assert_eq!(text(&t, "x")[2].bytes, vec![0x1B, 0x4D, 0x01]);
    }

    #[test]
    fn test_qr_reuses_horizontal_offset() {
        let q = QrCode {
            id: "q".into(),
            x: 10.0,
            y: 5.0,
            ..Default::default()
        };
        let cmds = qrcode(&q, "SKU-000123");
        // origin (88, 48) plus offset 10 on both axes
        assert_eq!(cmds[0].bytes, vertical_position(58));
        assert_eq!(cmds[1].bytes, horizontal_position(98));
    }

    #[test]
    fn test_non_square_qr_uses_width_offset_vertically() {
        // 20 x 10 mm, 1mm padding: 144 usable dots, cell 6, offset 9
        let q = QrCode {
            id: "q".into(),
            x: 0.0,
            y: 5.0,
            width: 20.0,
            height: 10.0,
            padding: 1.0,
            ..Default::default()
        };
        let cmds = qrcode(&q, "ABC");
        assert_eq!(cmds[0].bytes, vertical_position(48 + 9));
        assert_eq!(cmds[1].bytes, horizontal_position(8 + 9));
        assert_eq!(cmds[3].bytes, qr::cell_size(6));
    }

    #[test]
    fn test_box_is_comment_only() {
        let doc = Document {
            label_size: LabelSize::new("t", 50.0, 30.0),
            elements: vec![Element::Box(BoxShape {
                id: "b".into(),
                ..Default::default()
            })],
        };
        let plain = compile(&doc, &VariableMap::new(), false);
        assert_eq!(plain, "1B 40 1B 4C 1B 57 00 00 00 00 90 01 F0 00 0C 1D 56 00");
        let commented = compile(&doc, &VariableMap::new(), true);
        assert!(commented.lines().any(|l| l.starts_with("// Box")));
        assert_eq!(commented.lines().count(), 6);
    }

    #[test]
    fn test_comment_trailers() {
        let doc = Document::new(LabelSize::new("t", 50.0, 30.0));
        let out = compile(&doc, &VariableMap::new(), true);
        let first = out.lines().next().unwrap();
        assert_eq!(first, "1B 40 // Initialize printer");
        assert_eq!(out.lines().last().unwrap(), "1D 56 00 // Full cut");
    }
}
