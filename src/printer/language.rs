//! Printer command languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;

/// Command language understood by the target printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterLanguage {
    /// TSC / Godex label printers
    #[default]
    Tspl,
    /// Zebra label printers
    Zpl,
    /// Generic receipt printers in page mode
    #[serde(alias = "esc-pos", alias = "esc/pos")]
    EscPos,
}

impl PrinterLanguage {
    /// All supported languages.
    pub const ALL: [PrinterLanguage; 3] = [Self::Tspl, Self::Zpl, Self::EscPos];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tspl => "tspl",
            Self::Zpl => "zpl",
            Self::EscPos => "escpos",
        }
    }

    /// Whether the compiled output is a byte stream rendered as hex text.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::EscPos)
    }
}

impl fmt::Display for PrinterLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrinterLanguage {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tspl" => Ok(Self::Tspl),
            "zpl" => Ok(Self::Zpl),
            "escpos" | "esc-pos" | "esc/pos" => Ok(Self::EscPos),
            _ => Err(LabelError::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}
