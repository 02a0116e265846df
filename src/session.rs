//! # Session Persistence
//!
//! The editor's durable state is a single [`SessionState`] record: the
//! document plus the operator's settings. It is loaded once when an
//! [`Editor`](crate::editor::Editor) is created and rewritten after every
//! change.
//!
//! Storage is behind the [`SessionStore`] trait. [`MemoryStore`] keeps the
//! record in process (tests, one-shot CLI runs); [`FileStore`] writes it as
//! pretty-printed JSON. [`BackgroundStore`] wraps another store and moves
//! its writes onto a worker thread, so a save never blocks the caller.
//! Saves queued while a write is in flight collapse to the newest one, and
//! dropping the store flushes what is still queued.
//!
//! ## Format
//!
//! ```json
//! {
//!   "labelSize": { "name": "50 x 30 mm", "width": 50.0, "height": 30.0 },
//!   "elements": [ ... ],
//!   "customVariables": { "{lot}": "7" },
//!   "printerLang": "tspl",
//!   "gridSize": 1.0
//! }
//! ```
//!
//! The settings keys are optional on load so older files stay readable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::document::{Document, Element, LabelSize};
use crate::error::LabelError;
use crate::printer::PrinterLanguage;
use crate::variables::VariableMap;

/// Default snapping grid, in millimetres.
pub const DEFAULT_GRID_SIZE: f64 = 1.0;

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub label_size: LabelSize,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub custom_variables: VariableMap,
    #[serde(default)]
    pub printer_lang: PrinterLanguage,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::from_document(&Document::default_layout())
    }
}

impl SessionState {
    /// Session around `doc` with default settings.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            label_size: doc.label_size.clone(),
            elements: doc.elements.clone(),
            custom_variables: VariableMap::new(),
            printer_lang: PrinterLanguage::default(),
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    pub fn document(&self) -> Document {
        Document {
            label_size: self.label_size.clone(),
            elements: self.elements.clone(),
        }
    }
}

/// Durable storage for a [`SessionState`].
pub trait SessionStore: Send + Sync {
    /// Stored state, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<SessionState>, LabelError>;

    /// Replace the stored state.
    fn save(&self, state: &SessionState) -> Result<(), LabelError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn load(&self) -> Result<Option<SessionState>, LabelError> {
        (**self).load()
    }

    fn save(&self, state: &SessionState) -> Result<(), LabelError> {
        (**self).save(state)
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<SessionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `state`.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// Last saved state.
    pub fn snapshot(&self) -> Option<SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<SessionState>, LabelError> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &SessionState) -> Result<(), LabelError> {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(state.clone());
        Ok(())
    }
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<SessionState>, LabelError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no session file");
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let state: SessionState = serde_json::from_str(&json)?;
        info!(
            path = %self.path.display(),
            elements = state.elements.len(),
            "loaded session"
        );
        Ok(Some(state))
    }

    fn save(&self, state: &SessionState) -> Result<(), LabelError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }
}

enum WriteCommand {
    Save(Box<SessionState>),
    Shutdown,
}

/// Store whose saves are written by a dedicated thread.
///
/// `save` only queues the state and fails only once the writer is gone;
/// write errors are logged by the writer. `load` reads the wrapped store
/// directly and does not see queued saves.
pub struct BackgroundStore<S: SessionStore + 'static> {
    inner: Arc<S>,
    sender: mpsc::Sender<WriteCommand>,
    handle: Option<JoinHandle<()>>,
}

impl<S: SessionStore + 'static> BackgroundStore<S> {
    /// Spawn the writer thread for `inner`.
    pub fn start(inner: S) -> Result<Self, LabelError> {
        let inner = Arc::new(inner);
        let worker = Arc::clone(&inner);
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("session-writer".into())
            .spawn(move || writer_loop(worker.as_ref(), rx))?;

        Ok(Self {
            inner,
            sender: tx,
            handle: Some(handle),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn shutdown(&mut self) {
        let _ = self.sender.send(WriteCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl<S: SessionStore + 'static> Drop for BackgroundStore<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: SessionStore + 'static> SessionStore for BackgroundStore<S> {
    fn load(&self) -> Result<Option<SessionState>, LabelError> {
        self.inner.load()
    }

    fn save(&self, state: &SessionState) -> Result<(), LabelError> {
        self.sender
            .send(WriteCommand::Save(Box::new(state.clone())))
            .map_err(|_| io::Error::other("session writer has stopped").into())
    }
}

fn writer_loop<S: SessionStore>(store: &S, rx: mpsc::Receiver<WriteCommand>) {
    while let Ok(WriteCommand::Save(mut state)) = rx.recv() {
        let mut shutdown = false;
        while let Ok(next) = rx.try_recv() {
            match next {
                WriteCommand::Save(newer) => state = newer,
                WriteCommand::Shutdown => {
                    shutdown = true;
                    break;
                }
            }
        }
        if let Err(e) = store.save(&state) {
            warn!(error = %e, "failed to save session");
        }
        if shutdown {
            break;
        }
    }
    debug!("session writer stopped");
}
