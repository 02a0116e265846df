//! # Serial Device Transport
//!
//! Sends print jobs to a printer exposed as a character device: a USB
//! serial adapter (`/dev/ttyUSB0`), a USB printer class device
//! (`/dev/usb/lp0`) or a Bluetooth SPP binding (`/dev/rfcomm0`).
//!
//! ## Bluetooth Setup (Linux)
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# pair 00:11:62:XX:XX:XX
//! $ sudo rfcomm bind 0 00:11:62:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! Terminal devices are switched to raw mode so job bytes pass through
//! unmodified:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL
//! - **No flow control**: IXON, IXOFF, IXANY (0x11/0x13 occur in ESC/POS data)
//! - **No output processing**: OPOST (TSPL/ZPL newlines are sent as-is)
//! - **8-bit characters**: CS8, no parity
//! - **No echo, non-canonical**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
//!
//! Devices that are not terminals (`lp` class devices) are written as-is.
//!
//! ## Chunked Writes
//!
//! Jobs are written in 4096-byte chunks with a short pause between them so
//! small printer buffers are not overrun.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::Transport;
use crate::error::LabelError;

/// Default printer device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
pub const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Device Transport
///
/// ## Example
///
/// ```no_run
/// use labelsmith::transport::{DeviceTransport, Transport};
///
/// let mut transport = DeviceTransport::open("/dev/rfcomm0")?;
/// transport.write_all(b"SIZE 50 mm,30 mm\nCLS\nPRINT 1,1\n")?;
///
/// # Ok::<(), labelsmith::error::LabelError>(())
/// ```
pub struct DeviceTransport {
    file: File,
    path: PathBuf,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl DeviceTransport {
    /// Open `device` for writing and switch it to raw mode if it is a TTY.
    ///
    /// ## Errors
    ///
    /// Returns [`LabelError::Transport`] if:
    /// - The device doesn't exist
    /// - Permission denied (may need the dialout or lp group)
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, LabelError> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| LabelError::Transport(format!("Failed to open {}: {}", path.display(), e)))?;

        if is_tty(file.as_raw_fd()) {
            configure_tty_raw(file.as_raw_fd())?;
        }
        debug!(device = %path.display(), "opened printer device");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        })
    }

    /// Open with default device path (/dev/rfcomm0)
    pub fn open_default() -> Result<Self, LabelError> {
        Self::open(DEFAULT_DEVICE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }
}

impl Transport for DeviceTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), LabelError> {
        let chunks = write_chunked(&mut self.file, data, self.chunk_size, self.chunk_delay)
            .map_err(|e| LabelError::Transport(format!("Write failed: {}", e)))?;
        info!(device = %self.path.display(), bytes = data.len(), chunks, "job sent");
        Ok(())
    }
}

/// Write `data` to `writer` in chunks of at most `chunk_size` bytes,
/// sleeping `delay` between chunks, then flush. Returns the chunk count.
pub fn write_chunked<W: Write>(
    writer: &mut W,
    data: &[u8],
    chunk_size: usize,
    delay: Duration,
) -> io::Result<usize> {
    let mut count = 0;
    for (i, chunk) in data.chunks(chunk_size.max(1)).enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }
        writer.write_all(chunk)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(unix)]
fn is_tty(fd: i32) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

#[cfg(not(unix))]
fn is_tty(_fd: i32) -> bool {
    false
}

/// Configure a file descriptor for raw TTY mode.
///
/// Note: IXON/IXOFF/IXANY disable XON/XOFF software flow control. This is
/// required because 0x11 (XON/DC1) and 0x13 (XOFF/DC3) appear in binary
/// ESC/POS length fields.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), LabelError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(LabelError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(LabelError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> Result<(), LabelError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/rfcomm0");
    }

    #[test]
    fn test_write_chunked_splits() {
        let data = vec![0xAB; CHUNK_SIZE * 2 + 10];
        let mut out = Vec::new();
        let chunks = write_chunked(&mut out, &data, CHUNK_SIZE, Duration::ZERO).unwrap();
        assert_eq!(chunks, 3);
        assert_eq!(out, data);
    }

    #[test]
    fn test_write_chunked_empty() {
        let mut out = Vec::new();
        assert_eq!(write_chunked(&mut out, &[], CHUNK_SIZE, Duration::ZERO).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_open_missing_device() {
        let err = DeviceTransport::open("/nonexistent/printer0").err().unwrap();
        assert!(matches!(err, LabelError::Transport(_)));
    }

    #[test]
    fn test_plain_file_skips_tty_setup() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut transport = DeviceTransport::open(file.path()).unwrap();
        transport.set_chunk_delay(Duration::ZERO);
        transport.write_all(b"^XA^XZ").unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), b"^XA^XZ");
    }
}
