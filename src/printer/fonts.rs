//! Font table: editor font families and their printer font codes.
//!
//! The editor offers a fixed list of CSS font families. TSPL selects a
//! resident font by code; unknown families fall back to font `"0"`.
//! ZPL always uses the scalable `^A0` font and ESC/POS picks Font A or B
//! by size, so neither needs a family lookup.

/// Font family used when an element does not name one.
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

/// TSPL font code for unknown families.
pub const DEFAULT_TSPL_FONT: &str = "0";

/// Editor font family → TSPL font code.
pub const FONT_TABLE: &[(&str, &str)] = &[
    ("Arial, sans-serif", "0"),
    ("Courier New, monospace", "3"),
    ("Times New Roman, serif", "2"),
];

/// Font families offered by the editor.
pub fn font_families() -> Vec<&'static str> {
    FONT_TABLE.iter().map(|(family, _)| *family).collect()
}

/// Map a font family to its TSPL font code.
pub fn tspl_font(family: &str) -> &'static str {
    FONT_TABLE
        .iter()
        .find(|(f, _)| *f == family)
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_TSPL_FONT)
}

/// TSPL/ESC-POS character multiplier for a point size (12pt = 1x).
pub fn size_multiplier(font_size: f64) -> u32 {
    ((font_size / 12.0).round() as u32).max(1)
}
