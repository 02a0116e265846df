//! # Printer Transport Layer
//!
//! Delivery of compiled jobs to a printer. The compilers never depend on a
//! transport; the CLI and server hand the job bytes over once compiled.
//!
//! ## Available Transports
//!
//! - [`device`]: serial/USB/RFCOMM character devices (Linux)
//! - [`BufferTransport`]: collects bytes in memory (dry runs, tests)

pub mod device;

pub use device::DeviceTransport;

use crate::error::LabelError;

/// Sink for print job bytes.
pub trait Transport {
    /// Send the whole job.
    fn write_all(&mut self, data: &[u8]) -> Result<(), LabelError>;
}

/// In-memory transport.
#[derive(Debug, Default, Clone)]
pub struct BufferTransport {
    pub sent: Vec<u8>,
}

impl BufferTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for BufferTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), LabelError> {
        self.sent.extend_from_slice(data);
        Ok(())
    }
}
