//! Static catalogue handlers.

use axum::Json;
use serde::Serialize;

use crate::document::LabelSize;
use crate::printer::PrinterLanguage;
use crate::printer::config::presets;
use crate::printer::fonts::font_families;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogue {
    pub presets: Vec<LabelSize>,
    pub font_families: Vec<&'static str>,
    pub languages: Vec<PrinterLanguage>,
}

/// GET /api/presets - Label sizes, fonts and printer languages.
pub async fn list() -> Json<Catalogue> {
    Json(Catalogue {
        presets: presets(),
        font_families: font_families(),
        languages: PrinterLanguage::ALL.to_vec(),
    })
}
