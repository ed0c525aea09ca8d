//! Widget records and the persisted layout document.
//!
//! A [`LayoutDocument`] wraps the widget list with a schema version and a
//! forward-compatible extension bag, so layouts written by newer editors
//! still round-trip.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::GridLayout;

/// Current layout document schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// Opaque, stable widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A dashboard widget placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    pub grid_layout: GridLayout,
}

impl Widget {
    pub fn new(id: impl Into<WidgetId>, grid_layout: GridLayout) -> Self {
        Self {
            id: id.into(),
            grid_layout,
        }
    }

    /// Shorthand for a widget without a minimum width.
    pub fn at(id: impl Into<WidgetId>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self::new(id, GridLayout::new(x, y, w, h))
    }

    #[inline]
    pub const fn layout(&self) -> &GridLayout {
        &self.grid_layout
    }
}

/// Find a widget by id.
pub fn find_widget<'a>(widgets: &'a [Widget], id: &WidgetId) -> Option<&'a Widget> {
    widgets.iter().find(|widget| &widget.id == id)
}

/// Structural problems in a widget list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutValidationError {
    /// A widget has an empty id.
    EmptyId { index: usize },
    /// Two widgets share an id.
    DuplicateId { id: WidgetId },
    /// A widget has zero width or height.
    DegenerateSize { id: WidgetId, w: u32, h: u32 },
    /// `minW` is larger than the widget's width.
    MinWidthExceedsWidth { id: WidgetId, min_w: u32, w: u32 },
    /// The document's schema version is not supported.
    UnsupportedVersion { found: u16, expected: u16 },
}

impl fmt::Display for LayoutValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId { index } => write!(f, "widget at index {index} has an empty id"),
            Self::DuplicateId { id } => write!(f, "duplicate widget id '{id}'"),
            Self::DegenerateSize { id, w, h } => {
                write!(f, "widget '{id}' has degenerate size {w}x{h}")
            }
            Self::MinWidthExceedsWidth { id, min_w, w } => {
                write!(f, "widget '{id}' has minW {min_w} larger than width {w}")
            }
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported layout schema version {found} (expected {expected})"
            ),
        }
    }
}

impl std::error::Error for LayoutValidationError {}

/// Check that ids are unique and non-empty and that every size is positive.
pub fn validate_widgets(widgets: &[Widget]) -> Result<(), LayoutValidationError> {
    let mut seen = BTreeSet::new();
    for (index, widget) in widgets.iter().enumerate() {
        if widget.id.as_str().is_empty() {
            return Err(LayoutValidationError::EmptyId { index });
        }
        if !seen.insert(&widget.id) {
            return Err(LayoutValidationError::DuplicateId {
                id: widget.id.clone(),
            });
        }
        let layout = widget.layout();
        if layout.w == 0 || layout.h == 0 {
            return Err(LayoutValidationError::DegenerateSize {
                id: widget.id.clone(),
                w: layout.w,
                h: layout.h,
            });
        }
        match layout.min_w {
            Some(min_w) if min_w > layout.w => {
                return Err(LayoutValidationError::MinWidthExceedsWidth {
                    id: widget.id.clone(),
                    min_w,
                    w: layout.w,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Persisted dashboard layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default = "default_layout_version")]
    pub schema_version: u16,
    pub widgets: Vec<Widget>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

fn default_layout_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

impl LayoutDocument {
    #[must_use]
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            widgets,
            extensions: BTreeMap::new(),
        }
    }

    /// Copy of this document with its widget list replaced.
    #[must_use]
    pub fn with_widgets(&self, widgets: Vec<Widget>) -> Self {
        Self {
            widgets,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), LayoutValidationError> {
        if self.schema_version != LAYOUT_SCHEMA_VERSION {
            return Err(LayoutValidationError::UnsupportedVersion {
                found: self.schema_version,
                expected: LAYOUT_SCHEMA_VERSION,
            });
        }
        validate_widgets(&self.widgets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_serializes_with_grid_layout_key() {
        let widget = Widget::at("sales", 0, 2, 6, 4);
        let json = serde_json::to_string(&widget).expect("serialize");
        assert_eq!(
            json,
            r#"{"id":"sales","gridLayout":{"x":0,"y":2,"w":6,"h":4}}"#
        );
    }

    #[test]
    fn valid_widgets_pass() {
        let widgets = vec![Widget::at("a", 0, 0, 2, 2), Widget::at("b", 2, 0, 2, 2)];
        assert_eq!(validate_widgets(&widgets), Ok(()));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let widgets = vec![Widget::at("a", 0, 0, 2, 2), Widget::at("a", 5, 0, 2, 2)];
        assert_eq!(
            validate_widgets(&widgets),
            Err(LayoutValidationError::DuplicateId {
                id: WidgetId::new("a")
            })
        );
    }

    #[test]
    fn zero_sized_widget_rejected() {
        let widgets = vec![Widget::at("flat", 0, 0, 3, 0)];
        let err = validate_widgets(&widgets).expect_err("zero height");
        assert!(matches!(err, LayoutValidationError::DegenerateSize { w: 3, h: 0, .. }));
    }

    #[test]
    fn empty_id_rejected() {
        let widgets = vec![Widget::at("", 0, 0, 1, 1)];
        assert_eq!(
            validate_widgets(&widgets),
            Err(LayoutValidationError::EmptyId { index: 0 })
        );
    }

    #[test]
    fn min_width_above_width_rejected() {
        let widgets = vec![Widget::new("w", GridLayout::new(0, 0, 2, 2).with_min_w(3))];
        assert!(matches!(
            validate_widgets(&widgets),
            Err(LayoutValidationError::MinWidthExceedsWidth { min_w: 3, w: 2, .. })
        ));
    }

    #[test]
    fn document_defaults_schema_version() {
        let doc: LayoutDocument = serde_json::from_str(
            r#"{"widgets":[{"id":"a","gridLayout":{"x":0,"y":0,"w":1,"h":1}}]}"#,
        )
        .expect("deserialize");
        assert_eq!(doc.schema_version, LAYOUT_SCHEMA_VERSION);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn document_rejects_future_version() {
        let mut doc = LayoutDocument::new(Vec::new());
        doc.schema_version = 9;
        assert_eq!(
            doc.validate(),
            Err(LayoutValidationError::UnsupportedVersion {
                found: 9,
                expected: LAYOUT_SCHEMA_VERSION
            })
        );
    }

    #[test]
    fn with_widgets_keeps_extensions() {
        let mut doc = LayoutDocument::new(vec![Widget::at("a", 0, 0, 1, 1)]);
        doc.extensions.insert("editor".into(), "v2".into());
        let replaced = doc.with_widgets(vec![Widget::at("a", 3, 0, 1, 1)]);
        assert_eq!(replaced.extensions.get("editor").map(String::as_str), Some("v2"));
        assert_eq!(replaced.widgets[0].grid_layout.x, 3);
    }

    #[test]
    fn find_widget_by_id() {
        let widgets = vec![Widget::at("a", 0, 0, 1, 1), Widget::at("b", 1, 0, 1, 1)];
        let found = find_widget(&widgets, &WidgetId::new("b")).expect("present");
        assert_eq!(found.grid_layout.x, 1);
        assert!(find_widget(&widgets, &WidgetId::new("zzz")).is_none());
    }
}
