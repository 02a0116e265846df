//! # Printer Module
//!
//! Static tables shared by the editor and the protocol encoders.
//!
//! ## Modules
//!
//! - [`config`]: Unit conversion (8 dots/mm) and label-size presets
//! - [`fonts`]: Font family → printer font code table
//! - [`language`]: Supported printer command languages

pub mod config;
pub mod fonts;
pub mod language;

pub use config::{DOTS_PER_MM, mm_to_dots};
pub use language::PrinterLanguage;
