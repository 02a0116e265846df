//! Server state and configuration.

use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::warn;

use crate::editor::Editor;
use crate::session::{BackgroundStore, FileStore, MemoryStore, SessionStore};
use crate::transport::device::DEFAULT_DEVICE;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the printer device (e.g., "/dev/rfcomm0")
    pub device_path: String,
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Session file; `None` keeps the session in memory only.
    pub session_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            session_path: None,
        }
    }
}

/// Type-erased store so the server works with either backend.
pub type SharedStore = Box<dyn SessionStore>;

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// The persisted editing session.
    pub editor: RwLock<Editor<SharedStore>>,
}

impl AppState {
    /// State with the session file, when configured, written from a
    /// background thread so handlers never wait on the disk.
    pub fn new(config: ServerConfig) -> Self {
        let store: SharedStore = match &config.session_path {
            Some(path) => match BackgroundStore::start(FileStore::new(path.clone())) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    warn!(error = %e, "session writer unavailable, saving inline");
                    Box::new(FileStore::new(path.clone()))
                }
            },
            None => Box::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: ServerConfig, store: SharedStore) -> Self {
        Self {
            config,
            editor: RwLock::new(Editor::new(store)),
        }
    }
}
