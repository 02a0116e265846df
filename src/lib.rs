//! # Labelsmith - Thermal Label Designer Core
//!
//! Labelsmith is the engine behind a thermal label designer. It provides:
//!
//! - **Document model**: label size plus z-ordered text, QR, barcode and box elements
//! - **Editor**: selection, drag/resize gestures, grid snapping, alignment, undo/redo
//! - **Variables**: `{token}` substitution at print time
//! - **Compilers**: TSPL, ZPL and ESC/POS job generation at 203 DPI
//! - **Transport**: raw serial/RFCOMM device output
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelsmith::{
//!     document::{Document, ElementKind, ElementPatch},
//!     printer::PrinterLanguage,
//!     protocol,
//!     transport::{DeviceTransport, Transport},
//!     variables::VariableMap,
//! };
//!
//! let mut doc = Document::default_layout();
//! doc.add_element(ElementKind::Text, &ElementPatch::content("Batch {batch}"));
//!
//! let vars = VariableMap::with_defaults(chrono::Local::now(), &VariableMap::new());
//! let job = protocol::payload(PrinterLanguage::Tspl, &doc, &vars);
//!
//! let mut transport = DeviceTransport::open("/dev/rfcomm0")?;
//! transport.write_all(&job)?;
//!
//! # Ok::<(), labelsmith::error::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Label model, element operations, template JSON |
//! | [`editor`] | Interactive session: gestures, selection, history |
//! | [`variables`] | Variable map and resolver |
//! | [`protocol`] | TSPL / ZPL / ESC-POS compilers |
//! | [`printer`] | Units, fonts, presets, printer languages |
//! | [`session`] | Persisted session state and stores |
//! | [`transport`] | Printer device output |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod document;
pub mod editor;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;
pub mod variables;

// Re-exports for convenience
pub use document::Document;
pub use editor::Editor;
pub use error::LabelError;
pub use printer::PrinterLanguage;
pub use transport::DeviceTransport;
pub use variables::VariableMap;

/// Install the global `tracing` subscriber: formatted output on stderr,
/// filtered by `RUST_LOG` with `info` as the floor. Calling it again is a
/// no-op.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
