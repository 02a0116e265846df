//! # Unit Table and Label Presets
//!
//! All layout geometry is stored in millimetres. Every supported printer runs
//! at 203 DPI, which this crate fixes at exactly 8 dots per millimetre.
//!
//! ## Calculations
//!
//! ```text
//! dots_per_mm = 203 / 25.4 ≈ 8
//! dots = round(mm * 8)
//!
//! For a 50mm wide label:
//!   width_dots = 50 * 8 = 400
//! ```
//!
//! ## Usage
//!
//! ```
//! use labelsmith::printer::config::{mm_to_dots, preset};
//!
//! assert_eq!(mm_to_dots(2.0), 16);
//! let size = preset("50 x 30 mm").unwrap();
//! assert_eq!(mm_to_dots(size.width), 400);
//! ```

use crate::document::LabelSize;

/// Resolution in dots per inch
pub const DPI: u16 = 203;

/// Fixed conversion factor between millimetres and printer dots
pub const DOTS_PER_MM: f64 = 8.0;

/// Millimetres per typographic point (1pt = 1/72 inch)
pub const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Convert millimetres to printer dots (`round(mm * 8)`).
#[inline]
pub fn mm_to_dots(mm: f64) -> i64 {
    (mm * DOTS_PER_MM).round() as i64
}

/// Convert a point size to printer dots.
#[inline]
pub fn points_to_dots(points: f64) -> i64 {
    mm_to_dots(points * MM_PER_POINT)
}

// ============================================================================
// LABEL PRESETS
// ============================================================================

/// Built-in label stock sizes: (name, width mm, height mm).
///
/// | Name | Typical use |
/// |------|-------------|
/// | 40 x 30 mm | Price tags |
/// | 50 x 30 mm | Product labels (default) |
/// | 58 x 40 mm | Receipt-width shelf labels |
/// | 100 x 50 mm | Carton labels |
/// | 100 x 150 mm | 4x6 shipping labels |
pub const LABEL_PRESETS: &[(&str, f64, f64)] = &[
    ("40 x 30 mm", 40.0, 30.0),
    ("50 x 30 mm", 50.0, 30.0),
    ("58 x 40 mm", 58.0, 40.0),
    ("100 x 50 mm", 100.0, 50.0),
    ("100 x 150 mm", 100.0, 150.0),
];

/// Name of the preset used for new sessions.
pub const DEFAULT_PRESET: &str = "50 x 30 mm";

/// Look up a preset by name (case-insensitive).
pub fn preset(name: &str) -> Option<LabelSize> {
    LABEL_PRESETS
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .map(|&(n, w, h)| LabelSize::new(n, w, h))
}

/// All presets as label sizes.
pub fn presets() -> Vec<LabelSize> {
    LABEL_PRESETS
        .iter()
        .map(|&(n, w, h)| LabelSize::new(n, w, h))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_dots() {
        assert_eq!(mm_to_dots(0.0), 0);
        assert_eq!(mm_to_dots(2.0), 16);
        assert_eq!(mm_to_dots(0.5), 4);
        assert_eq!(mm_to_dots(0.06), 0);
        assert_eq!(mm_to_dots(0.07), 1);
    }

    #[test]
    fn test_points_to_dots() {
        // 12pt ≈ 4.23mm ≈ 34 dots
        assert_eq!(points_to_dots(12.0), 34);
    }

    #[test]
    fn test_preset_lookup() {
        let size = preset("100 X 150 MM").unwrap();
        assert_eq!(size.width, 100.0);
        assert_eq!(size.height, 150.0);
        assert!(preset("A4").is_none());
    }

    #[test]
    fn test_default_preset_exists() {
        assert!(preset(DEFAULT_PRESET).is_some());
        assert_eq!(presets().len(), LABEL_PRESETS.len());
    }
}
