//! Template export/import.
//!
//! The exported JSON is the interchange format between sessions:
//!
//! ```json
//! {
//!   "labelSize": {"name": "50 x 30 mm", "width": 50, "height": 30},
//!   "elements": [{"type": "text", "id": "el-1", "x": 2, "y": 2, "content": "HELLO"}],
//!   "version": "1.0",
//!   "timestamp": "2026-01-01T12:00:00Z"
//! }
//! ```
//!
//! Import only checks that `labelSize` and `elements` are present. Missing
//! element fields take defaults and unknown fields are carried along, so an
//! exported template re-imports unchanged. A `version` or `timestamp` of an
//! unexpected shape is tolerated, and elements without a readable `type`
//! are dropped with a warning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{Document, Element, LabelSize};
use crate::error::LabelError;

/// Format version written by [`Template::export`].
pub const TEMPLATE_VERSION: &str = "1.0";

/// Serialized label template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub label_size: LabelSize,
    #[serde(deserialize_with = "lenient_elements")]
    pub elements: Vec<Element>,
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: String,
    /// RFC 3339 string on export; epoch milliseconds are also read.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Template {
    /// Capture a document at the given time.
    pub fn from_document(doc: &Document, timestamp: DateTime<Utc>) -> Self {
        Self {
            label_size: doc.label_size.clone(),
            elements: doc.elements.clone(),
            version: TEMPLATE_VERSION.to_string(),
            timestamp: Some(timestamp),
        }
    }

    /// Export a document as pretty-printed JSON stamped with the current time.
    pub fn export(doc: &Document) -> Result<String, LabelError> {
        let template = Self::from_document(doc, Utc::now());
        Ok(serde_json::to_string_pretty(&template)?)
    }

    /// Parse template JSON. Fails only when the payload is not a JSON object,
    /// lacks `labelSize`/`elements`, or those cannot be read as a size and a
    /// list of typed elements.
    pub fn import(json: &str) -> Result<Self, LabelError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| LabelError::InvalidTemplate(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Same as [`Template::import`] for an already-parsed value.
    pub fn from_value(value: Value) -> Result<Self, LabelError> {
        let Value::Object(obj) = &value else {
            return Err(LabelError::InvalidTemplate(
                "expected a JSON object".to_string(),
            ));
        };
        for key in ["labelSize", "elements"] {
            if obj.get(key).is_none_or(Value::is_null) {
                return Err(LabelError::InvalidTemplate(format!("missing '{}'", key)));
            }
        }
        serde_json::from_value(value).map_err(|e| LabelError::InvalidTemplate(e.to_string()))
    }

    /// The template as a document, with an invalid label size replaced by
    /// the default and missing or repeated ids reassigned.
    pub fn into_document(self) -> Document {
        let mut doc = Document {
            label_size: self.label_size,
            elements: self.elements,
        };
        doc.normalize();
        doc
    }
}

fn lenient_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s).ok().map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

fn lenient_elements<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Element>, D::Error> {
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(element) => Some(element),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable template element");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roundtrip_default_layout() {
        let doc = Document::default_layout();
        let json = Template::export(&doc).unwrap();
        let back = Template::import(&json).unwrap().into_document();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_export_shape() {
        let doc = Document::default_layout();
        let value: Value = serde_json::from_str(&Template::export(&doc).unwrap()).unwrap();
        assert_eq!(value["version"], TEMPLATE_VERSION);
        assert!(value["timestamp"].is_string());
        assert_eq!(value["labelSize"]["width"], 50.0);
        assert_eq!(value["elements"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_import_missing_label_size() {
        let err = Template::import(r#"{"elements": []}"#).unwrap_err();
        assert!(matches!(err, LabelError::InvalidTemplate(ref m) if m.contains("labelSize")));
    }

    #[test]
    fn test_import_missing_elements() {
        let err = Template::import(r#"{"labelSize": {"width": 10, "height": 10}}"#).unwrap_err();
        assert!(matches!(err, LabelError::InvalidTemplate(ref m) if m.contains("elements")));
    }

    #[test]
    fn test_import_not_object() {
        assert!(Template::import("[1, 2]").is_err());
        assert!(Template::import("not json").is_err());
    }

    #[test]
    fn test_import_is_permissive() {
        let json = r#"{
            "labelSize": {"width": 40, "height": 30},
            "elements": [
                {"type": "text", "content": "no id or position"},
                {"type": "box", "id": "b1", "dashed": true}
            ]
        }"#;
        let template = Template::import(json).unwrap();
        assert_eq!(template.version, "");
        assert!(template.timestamp.is_none());
        assert_eq!(template.elements.len(), 2);
        assert_eq!(template.label_size.name, "");

        let again: Value = serde_json::to_value(&template.elements[1]).unwrap();
        assert_eq!(again["dashed"], true);
    }

    #[test]
    fn test_import_numeric_version_and_epoch_timestamp() {
        let json = r#"{
            "labelSize": {"width": 40, "height": 30},
            "elements": [],
            "version": 1,
            "timestamp": 1700000000000
        }"#;
        let template = Template::import(json).unwrap();
        assert_eq!(template.version, "1");
        assert_eq!(template.timestamp, DateTime::from_timestamp_millis(1_700_000_000_000));

        let odd = r#"{"labelSize": {"width": 40, "height": 30}, "elements": [], "version": null, "timestamp": "yesterday"}"#;
        let template = Template::import(odd).unwrap();
        assert_eq!(template.version, "");
        assert!(template.timestamp.is_none());
    }

    #[test]
    fn test_import_skips_untyped_elements() {
        let json = r#"{
            "labelSize": {"width": 40, "height": 30},
            "elements": [
                {"id": "x", "x": 1, "y": 1},
                {"type": "hologram", "id": "h"},
                {"type": "box", "id": "b1"}
            ]
        }"#;
        let template = Template::import(json).unwrap();
        assert_eq!(template.elements.len(), 1);
        assert_eq!(template.elements[0].id(), "b1");
    }

    #[test]
    fn test_import_assigns_missing_ids() {
        let json = r#"{
            "labelSize": {"width": 40, "height": 30},
            "elements": [
                {"type": "text", "content": "a"},
                {"type": "text", "content": "b"},
                {"type": "box", "id": "b1"},
                {"type": "box", "id": "b1"}
            ]
        }"#;
        let doc = Template::import(json).unwrap().into_document();
        let ids = doc.ids();
        assert_eq!(ids[2], "b1");
        assert!(ids.iter().all(|id| !id.is_empty()));
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_into_document_replaces_invalid_size() {
        let json = r#"{"labelSize": {"name": "broken", "width": 0, "height": -5}, "elements": []}"#;
        let doc = Template::import(json).unwrap().into_document();
        assert_eq!((doc.label_size.width, doc.label_size.height), (50.0, 30.0));
    }
}
