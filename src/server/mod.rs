//! # HTTP Server for Label Compilation and Printing
//!
//! Exposes the compilers, the printer device and the persisted editing
//! session as a small JSON API.
//!
//! ## Usage
//!
//! ```bash
//! labelsmith serve --listen 0.0.0.0:8080 --device /dev/rfcomm0 --session ~/.labelsmith/session.json
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/presets` | Label presets, font families, languages |
//! | POST | `/api/compile/:lang` | Compile a label, `text/plain` result |
//! | POST | `/api/print/:lang` | Compile and send to the printer device |
//! | GET | `/api/session` | Persisted session state |
//! | PUT | `/api/session` | Replace the session state |
//! | POST | `/api/template/validate` | Check a template export |

mod handlers;
mod state;

pub use handlers::ApiError;
pub use handlers::label::CompileRequest;
pub use state::{AppState, DEFAULT_LISTEN_ADDR, ServerConfig, SharedStore};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::LabelError;

/// Build the API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/presets", get(handlers::presets::list))
        .route("/api/compile/:lang", post(handlers::label::compile))
        .route("/api/print/:lang", post(handlers::label::print))
        .route(
            "/api/session",
            get(handlers::session::get).put(handlers::session::put),
        )
        .route(
            "/api/template/validate",
            post(handlers::label::validate_template),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use labelsmith::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), labelsmith::error::LabelError> {
/// let config = ServerConfig {
///     device_path: "/dev/rfcomm0".to_string(),
///     listen_addr: "0.0.0.0:8080".to_string(),
///     session_path: None,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LabelError> {
    let app_state = Arc::new(AppState::new(config.clone()));
    let app = router(app_state);

    info!(
        listen = %config.listen_addr,
        device = %config.device_path,
        session = ?config.session_path,
        "labelsmith HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| LabelError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| LabelError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
