//! # QR Symbol Estimation
//!
//! None of the target languages report the size of the QR symbol they will
//! draw, so every backend estimates it up front to pick a cell size that
//! fits the element's box and to centre the symbol inside it.
//!
//! ## Version Estimate
//!
//! The version is a step function of the content length (characters):
//!
//! | Length    | Version | Modules |
//! |-----------|---------|---------|
//! | ≤ 25      | 1       | 21      |
//! | ≤ 47      | 2       | 25      |
//! | ≤ 77      | 3       | 29      |
//! | ≤ 114     | 4       | 33      |
//! | ≤ 154     | 5       | 37      |
//! | ≤ 195     | 6       | 41      |
//! | ≤ 224     | 7       | 45      |
//! | ≤ 279     | 8       | 49      |
//! | ≤ 335     | 9       | 53      |
//! | > 335     | 10      | 57      |
//!
//! Content longer than version 10 holds is not an error: the estimate stays
//! at 10 and the symbol may overflow its box.
//!
//! ## Placement
//!
//! ```text
//! usable = dots(width - 2 * padding)
//! cell   = max(1, usable / modules)          (integer division)
//! offset = floor((usable - modules * cell) / 2)
//! ```
//!
//! The same `offset` is applied on both axes. It is derived from the width
//! only; the symbol is square, so no separate vertical offset is computed.

use crate::document::QrCode;
use crate::printer::mm_to_dots;

/// Upper content length of versions 1 through 9.
pub const VERSION_THRESHOLDS: [usize; 9] = [25, 47, 77, 114, 154, 195, 224, 279, 335];

/// Largest version the estimate produces.
pub const MAX_VERSION: u8 = 10;

/// Estimated QR version (1-10) for `len` characters of content.
pub fn estimate_version(len: usize) -> u8 {
    VERSION_THRESHOLDS
        .iter()
        .position(|&limit| len <= limit)
        .map(|i| i as u8 + 1)
        .unwrap_or(MAX_VERSION)
}

/// Modules per side for `version`.
pub fn module_count(version: u8) -> i64 {
    21 + (i64::from(version) - 1) * 4
}

/// Cell size and placement of one QR symbol, in printer dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrLayout {
    pub version: u8,
    pub modules: i64,
    /// Box width minus padding on both sides.
    pub usable: i64,
    pub cell: i64,
    /// Added to the padded origin on both axes.
    pub offset: i64,
    /// Padded top-left corner, before `offset`.
    pub origin_x: i64,
    pub origin_y: i64,
}

impl QrLayout {
    /// Layout for `qr` holding `content` (already variable-resolved).
    ///
    /// `max_cell` caps the cell size for languages with a hard limit.
    pub fn new(qr: &QrCode, content: &str, max_cell: Option<i64>) -> Self {
        let version = estimate_version(content.chars().count());
        let modules = module_count(version);
        let usable = mm_to_dots(qr.width - 2.0 * qr.padding);

        let mut cell = (usable.div_euclid(modules)).max(1);
        if let Some(cap) = max_cell {
            cell = cell.min(cap);
        }
        let offset = (usable - modules * cell).div_euclid(2);

        Self {
            version,
            modules,
            usable,
            cell,
            offset,
            origin_x: mm_to_dots(qr.x + qr.padding),
            origin_y: mm_to_dots(qr.y + qr.padding),
        }
    }

    /// Symbol top-left corner in dots.
    pub fn position(&self) -> (i64, i64) {
        (self.origin_x + self.offset, self.origin_y + self.offset)
    }
}
