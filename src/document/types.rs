//! Element struct types for the label document model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and the JSON template format. Field names are
//! camelCase on the wire (`fontSize`, `showBorder`, ...).
//!
//! Deserialization is deliberately permissive: every field has a default, and
//! fields this crate does not know about are kept in `extra` so a template
//! round-trips unchanged.
//!
//! Each element implements [`ElementMeta`] to declare its display label and
//! editor default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::editor::geometry::Size;
use crate::error::LabelError;
use crate::printer::fonts::DEFAULT_FONT_FAMILY;

/// Element identifier, unique within a document and immutable once created.
pub type ElementId = String;

/// Unknown JSON fields carried through import/export untouched.
pub type ExtraFields = Map<String, Value>;

/// Generate a fresh element id.
pub fn new_element_id() -> ElementId {
    format!("el-{}", uuid::Uuid::new_v4().simple())
}

/// Metadata that every element struct must provide.
pub trait ElementMeta: Sized {
    /// Human-readable display label (e.g. "QR Code").
    fn label() -> &'static str;

    /// Starter value for a newly added element.
    ///
    /// Distinct from `Default`: editor defaults have example content so new
    /// elements are immediately visible, and the id is left empty for the
    /// document to fill in.
    fn editor_default() -> Self;
}

// ============================================================================
// LABEL SIZE
// ============================================================================

/// Physical label stock size in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    #[serde(default)]
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl LabelSize {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Width and height are both strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

// ============================================================================
// ELEMENT VARIANTS
// ============================================================================

/// Text weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text element. Has no stored width/height; its footprint is measured by
/// the presentation layer and fed back to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Text {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    /// May contain `{variable}` tokens.
    pub content: String,
    /// Point size.
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_family: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            id: ElementId::new(),
            x: 0.0,
            y: 0.0,
            content: String::new(),
            font_size: 12.0,
            font_weight: FontWeight::Normal,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            extra: ExtraFields::new(),
        }
    }
}

impl ElementMeta for Text {
    fn label() -> &'static str { "Text" }
    fn editor_default() -> Self {
        Self { content: "Text".into(), x: 5.0, y: 5.0, ..Default::default() }
    }
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }
}

/// QR code element. Square in practice; `padding` is clearance inside the
/// optional border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrCode {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub width: f64,
    pub height: f64,
    pub show_border: bool,
    pub padding: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for QrCode {
    fn default() -> Self {
        Self {
            id: ElementId::new(),
            x: 0.0,
            y: 0.0,
            content: String::new(),
            width: 15.0,
            height: 15.0,
            show_border: true,
            padding: 1.0,
            extra: ExtraFields::new(),
        }
    }
}

impl ElementMeta for QrCode {
    fn label() -> &'static str { "QR Code" }
    fn editor_default() -> Self {
        Self { content: "https://example.com".into(), x: 5.0, y: 5.0, ..Default::default() }
    }
}

/// Code 128 barcode element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Barcode {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for Barcode {
    fn default() -> Self {
        Self {
            id: ElementId::new(),
            x: 0.0,
            y: 0.0,
            content: String::new(),
            width: 40.0,
            height: 10.0,
            extra: ExtraFields::new(),
        }
    }
}

impl ElementMeta for Barcode {
    fn label() -> &'static str { "Barcode" }
    fn editor_default() -> Self {
        Self { content: "123456789".into(), x: 5.0, y: 5.0, ..Default::default() }
    }
}

/// Rectangle outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxShape {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for BoxShape {
    fn default() -> Self {
        Self {
            id: ElementId::new(),
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 10.0,
            stroke_width: 0.5,
            extra: ExtraFields::new(),
        }
    }
}

impl ElementMeta for BoxShape {
    fn label() -> &'static str { "Rectangle" }
    fn editor_default() -> Self {
        Self { x: 5.0, y: 5.0, ..Default::default() }
    }
}

// ============================================================================
// ELEMENT ENUM
// ============================================================================

/// A positioned label element. Sequence order is z-order (index 0 = back).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(Text),
    QrCode(QrCode),
    Barcode(Barcode),
    Box(BoxShape),
}

/// Discriminant of [`Element`], used when adding new elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    QrCode,
    Barcode,
    Box,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [Self::Text, Self::QrCode, Self::Barcode, Self::Box];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => Text::label(),
            Self::QrCode => QrCode::label(),
            Self::Barcode => Barcode::label(),
            Self::Box => BoxShape::label(),
        }
    }

    /// Editor default element of this kind (id left empty).
    pub fn editor_default(&self) -> Element {
        match self {
            Self::Text => Element::Text(Text::editor_default()),
            Self::QrCode => Element::QrCode(QrCode::editor_default()),
            Self::Barcode => Element::Barcode(Barcode::editor_default()),
            Self::Box => Element::Box(BoxShape::editor_default()),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::QrCode => "qrcode",
            Self::Barcode => "barcode",
            Self::Box => "box",
        })
    }
}

impl FromStr for ElementKind {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "qrcode" | "qr" | "qr_code" => Ok(Self::QrCode),
            "barcode" => Ok(Self::Barcode),
            "box" | "rect" | "rectangle" => Ok(Self::Box),
            other => Err(LabelError::InvalidArgument(format!(
                "unknown element type '{}'",
                other
            ))),
        }
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text(_) => ElementKind::Text,
            Self::QrCode(_) => ElementKind::QrCode,
            Self::Barcode(_) => ElementKind::Barcode,
            Self::Box(_) => ElementKind::Box,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Text(e) => &e.id,
            Self::QrCode(e) => &e.id,
            Self::Barcode(e) => &e.id,
            Self::Box(e) => &e.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        match self {
            Self::Text(e) => e.id = id,
            Self::QrCode(e) => e.id = id,
            Self::Barcode(e) => e.id = id,
            Self::Box(e) => e.id = id,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            Self::Text(e) => e.x,
            Self::QrCode(e) => e.x,
            Self::Barcode(e) => e.x,
            Self::Box(e) => e.x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            Self::Text(e) => e.y,
            Self::QrCode(e) => e.y,
            Self::Barcode(e) => e.y,
            Self::Box(e) => e.y,
        }
    }

    /// Move the element's top-left corner, clamped to non-negative coordinates.
    pub fn set_position(&mut self, x: f64, y: f64) {
        let (x, y) = (x.max(0.0), y.max(0.0));
        match self {
            Self::Text(e) => (e.x, e.y) = (x, y),
            Self::QrCode(e) => (e.x, e.y) = (x, y),
            Self::Barcode(e) => (e.x, e.y) = (x, y),
            Self::Box(e) => (e.x, e.y) = (x, y),
        }
    }

    /// Stored width/height. `None` for text, whose size is only known once
    /// rendered.
    pub fn explicit_size(&self) -> Option<Size> {
        match self {
            Self::Text(_) => None,
            Self::QrCode(e) => Some(Size::new(e.width, e.height)),
            Self::Barcode(e) => Some(Size::new(e.width, e.height)),
            Self::Box(e) => Some(Size::new(e.width, e.height)),
        }
    }

    /// Only QR codes, barcodes and boxes carry resize handles.
    pub fn is_resizable(&self) -> bool {
        self.explicit_size().is_some()
    }

    /// Set width/height, each clamped to at least 1mm. No-op for text.
    pub fn set_size(&mut self, size: Size) {
        let (w, h) = (size.width.max(1.0), size.height.max(1.0));
        match self {
            Self::Text(_) => {}
            Self::QrCode(e) => (e.width, e.height) = (w, h),
            Self::Barcode(e) => (e.width, e.height) = (w, h),
            Self::Box(e) => (e.width, e.height) = (w, h),
        }
    }

    /// Text payload, if the variant has one.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Text(e) => Some(&e.content),
            Self::QrCode(e) => Some(&e.content),
            Self::Barcode(e) => Some(&e.content),
            Self::Box(_) => None,
        }
    }
}

// ============================================================================
// PARTIAL UPDATES
// ============================================================================

/// Partial field set merged into an element by `add_element` overrides and
/// `update_element`. Fields that do not apply to the target variant are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_border: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl ElementPatch {
    /// Patch that only moves an element.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Patch that only replaces content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into `element`. Position is clamped to ≥ 0 and
    /// width/height to ≥ 1mm so the document invariants hold.
    pub fn apply(&self, element: &mut Element) {
        if self.x.is_some() || self.y.is_some() {
            let x = self.x.unwrap_or_else(|| element.x());
            let y = self.y.unwrap_or_else(|| element.y());
            element.set_position(x, y);
        }
        if let Some(current) = element.explicit_size() {
            if self.width.is_some() || self.height.is_some() {
                element.set_size(Size::new(
                    self.width.unwrap_or(current.width),
                    self.height.unwrap_or(current.height),
                ));
            }
        }

        match element {
            Element::Text(t) => {
                if let Some(content) = &self.content {
                    t.content = content.clone();
                }
                if let Some(size) = self.font_size {
                    t.font_size = size.max(1.0);
                }
                if let Some(weight) = self.font_weight {
                    t.font_weight = weight;
                }
                if let Some(family) = &self.font_family {
                    t.font_family = family.clone();
                }
            }
            Element::QrCode(q) => {
                if let Some(content) = &self.content {
                    q.content = content.clone();
                }
                if let Some(border) = self.show_border {
                    q.show_border = border;
                }
                if let Some(padding) = self.padding {
                    q.padding = padding.max(0.0);
                }
            }
            Element::Barcode(b) => {
                if let Some(content) = &self.content {
                    b.content = content.clone();
                }
            }
            Element::Box(b) => {
                if let Some(stroke) = self.stroke_width {
                    b.stroke_width = stroke.max(0.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_wire_format() {
        let el = Element::Text(Text {
            id: "a".into(),
            x: 2.0,
            y: 3.0,
            content: "HELLO".into(),
            font_weight: FontWeight::Bold,
            ..Default::default()
        });
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["fontSize"], 12.0);
        assert_eq!(json["fontWeight"], "bold");
        assert_eq!(json["fontFamily"], "Arial, sans-serif");
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn test_qrcode_tag() {
        let json = r#"{"type": "qrcode", "id": "q", "content": "x", "showBorder": false}"#;
        let el: Element = serde_json::from_str(json).unwrap();
        match el {
            Element::QrCode(q) => {
                assert!(!q.show_border);
                assert_eq!(q.width, 15.0);
                assert_eq!(q.padding, 1.0);
            }
            other => panic!("expected qrcode, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_accepted() {
        let el: Element = serde_json::from_str(r#"{"type": "box"}"#).unwrap();
        assert_eq!(el.kind(), ElementKind::Box);
        assert_eq!(el.id(), "");
        assert_eq!(el.explicit_size(), Some(Size::new(20.0, 10.0)));
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let json = r#"{"type": "barcode", "id": "b", "content": "42", "rotation": 90, "meta": {"k": "v"}}"#;
        let el: Element = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&el).unwrap();
        assert_eq!(back["rotation"], 90);
        assert_eq!(back["meta"]["k"], "v");
        assert_eq!(back["type"], "barcode");
    }

    #[test]
    fn test_set_position_clamps() {
        let mut el = Element::Box(BoxShape::default());
        el.set_position(-3.0, 4.0);
        assert_eq!((el.x(), el.y()), (0.0, 4.0));
    }

    #[test]
    fn test_set_size_clamps_and_ignores_text() {
        let mut el = Element::Barcode(Barcode::default());
        el.set_size(Size::new(0.2, -5.0));
        assert_eq!(el.explicit_size(), Some(Size::new(1.0, 1.0)));

        let mut text = Element::Text(Text::new("t"));
        text.set_size(Size::new(10.0, 10.0));
        assert_eq!(text.explicit_size(), None);
    }

    #[test]
    fn test_patch_applies_relevant_fields_only() {
        let mut el = Element::Box(BoxShape::default());
        let patch = ElementPatch {
            content: Some("ignored".into()),
            width: Some(30.0),
            stroke_width: Some(1.0),
            ..Default::default()
        };
        patch.apply(&mut el);
        match &el {
            Element::Box(b) => {
                assert_eq!(b.width, 30.0);
                assert_eq!(b.height, 10.0);
                assert_eq!(b.stroke_width, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(el.content(), None);
    }

    #[test]
    fn test_patch_partial_position() {
        let mut el = Element::Text(Text { x: 4.0, y: 9.0, ..Default::default() });
        ElementPatch { x: Some(1.0), ..Default::default() }.apply(&mut el);
        assert_eq!((el.x(), el.y()), (1.0, 9.0));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("QR".parse::<ElementKind>().unwrap(), ElementKind::QrCode);
        assert_eq!("rectangle".parse::<ElementKind>().unwrap(), ElementKind::Box);
        assert!("circle".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_new_ids_unique() {
        assert_ne!(new_element_id(), new_element_id());
    }
}
