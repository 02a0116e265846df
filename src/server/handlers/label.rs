//! Compile, print and template-validation handlers.
//!
//! These endpoints are stateless: the label travels in the request body and
//! the shared session is not touched.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::document::{Document, Element, LabelSize, Template};
use crate::error::LabelError;
use crate::printer::PrinterLanguage;
use crate::protocol;
use crate::transport::{DeviceTransport, Transport};
use crate::variables::VariableMap;

use super::super::state::AppState;
use super::{ApiError, parse_body};

/// Body of compile and print requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub label_size: LabelSize,
    pub elements: Vec<Element>,
    /// Custom variables laid over the seed set.
    #[serde(default)]
    pub variables: VariableMap,
    #[serde(default)]
    pub show_comments: bool,
}

impl CompileRequest {
    fn document(&self) -> Document {
        Document {
            label_size: self.label_size.clone(),
            elements: self.elements.clone(),
        }
    }

    fn variables(&self) -> VariableMap {
        VariableMap::with_defaults(Local::now(), &self.variables)
    }
}

/// Handle POST /api/compile/:lang - compile a label to printer commands.
///
/// Unknown languages answer 400 with the `ERROR: ...` marker as plain text.
pub async fn compile(Path(lang): Path<String>, body: String) -> Result<impl IntoResponse, ApiError> {
    let req: CompileRequest = parse_body(&body)?;
    let output = protocol::compile_named(&lang, &req.document(), &req.variables(), req.show_comments);
    let status = if lang.parse::<PrinterLanguage>().is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], output))
}

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub success: bool,
    pub message: String,
    pub bytes: usize,
}

/// Handle POST /api/print/:lang - compile and send to the configured device.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Path(lang): Path<String>,
    body: String,
) -> Result<Json<PrintResponse>, ApiError> {
    let lang: PrinterLanguage = lang.parse()?;
    let req: CompileRequest = parse_body(&body)?;
    let payload = protocol::payload(lang, &req.document(), &req.variables());
    let bytes = payload.len();
    let device_path = state.config.device_path.clone();

    let result = tokio::task::spawn_blocking(move || {
        let mut transport = DeviceTransport::open(&device_path)?;
        transport.write_all(&payload)?;
        Ok::<_, LabelError>(())
    })
    .await
    .map_err(|e| ApiError::internal(format!("Task error: {}", e)))?;

    match result {
        Ok(()) => {
            info!(%lang, bytes, "label printed");
            Ok(Json(PrintResponse {
                success: true,
                message: "Label sent to printer".to_string(),
                bytes,
            }))
        }
        Err(e) => {
            warn!(error = %e, "print failed");
            Err(ApiError::internal(format!("Print failed: {}", e)))
        }
    }
}

/// Handle POST /api/template/validate - check that a template would import.
pub async fn validate_template(body: String) -> Result<Json<Value>, ApiError> {
    let template = Template::import(&body)?;
    Ok(Json(json!({
        "success": true,
        "version": template.version,
        "elements": template.elements.len(),
        "labelSize": template.label_size,
    })))
}
