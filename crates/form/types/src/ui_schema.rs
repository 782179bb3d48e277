//! UI Schema: the layout tree that arranges schema fields
//!
//! Elements are a closed set discriminated by their `type` field:
//! `Control`, `Label`, `VerticalLayout`, `HorizontalLayout`, `Group`,
//! `Categorization` and `Category`.

use crate::{FieldPath, FormError, FormResult, JsonSchema, SchemaProperty};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of rows for multi-line text
pub const DEFAULT_TEXTAREA_ROWS: u32 = 3;
/// Default accept list for file controls
pub const DEFAULT_FILE_ACCEPT: &str = "*/*";
/// Default upload size limit for file controls (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

// ── Elements ─────────────────────────────────────────────────────────

/// A node of the UI schema tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiSchemaElement {
    Control(ControlElement),
    Label(LabelElement),
    VerticalLayout(LayoutElement),
    HorizontalLayout(LayoutElement),
    Group(LayoutElement),
    Categorization(LayoutElement),
    Category(CategoryElement),
}

/// The kind of a layout element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Vertical,
    Horizontal,
    Group,
    Categorization,
}

/// A leaf bound to one schema property through a scope pointer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlElement {
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub options: ControlOptions,
}

/// Static text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelElement {
    pub text: String,
}

/// A container of ordered child elements
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub elements: Vec<UiSchemaElement>,
}

/// One tab of a categorization layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryElement {
    pub label: String,
    #[serde(default)]
    pub elements: Vec<UiSchemaElement>,
}

impl UiSchemaElement {
    /// Parse a UI schema from JSON.
    ///
    /// An empty object or `null` stands for "no UI schema" and produces the
    /// default vertical layout for `schema`.
    pub fn from_value(value: Value, schema: &JsonSchema) -> FormResult<Self> {
        let is_blank = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_blank {
            return Ok(Self::default_for(schema));
        }

        let element: UiSchemaElement = serde_json::from_value(value)
            .map_err(|e| FormError::InvalidUiSchema(e.to_string()))?;
        element.validate_structure()?;
        Ok(element)
    }

    /// A vertical layout with one control per schema property, in order
    pub fn default_for(schema: &JsonSchema) -> Self {
        let elements = schema
            .properties
            .keys()
            .map(|name| UiSchemaElement::control(FieldPath::new(vec![name.clone()]).to_scope()))
            .collect();
        UiSchemaElement::VerticalLayout(LayoutElement {
            label: None,
            elements,
        })
    }

    pub fn control(scope: impl Into<String>) -> Self {
        UiSchemaElement::Control(ControlElement::new(scope))
    }

    pub fn label(text: impl Into<String>) -> Self {
        UiSchemaElement::Label(LabelElement { text: text.into() })
    }

    pub fn vertical(elements: Vec<UiSchemaElement>) -> Self {
        UiSchemaElement::VerticalLayout(LayoutElement {
            label: None,
            elements,
        })
    }

    pub fn horizontal(elements: Vec<UiSchemaElement>) -> Self {
        UiSchemaElement::HorizontalLayout(LayoutElement {
            label: None,
            elements,
        })
    }

    pub fn group(label: impl Into<String>, elements: Vec<UiSchemaElement>) -> Self {
        UiSchemaElement::Group(LayoutElement {
            label: Some(label.into()),
            elements,
        })
    }

    pub fn categorization(categories: Vec<UiSchemaElement>) -> Self {
        UiSchemaElement::Categorization(LayoutElement {
            label: None,
            elements: categories,
        })
    }

    pub fn category(label: impl Into<String>, elements: Vec<UiSchemaElement>) -> Self {
        UiSchemaElement::Category(CategoryElement {
            label: label.into(),
            elements,
        })
    }

    /// The layout kind and container of a layout element
    pub fn as_layout(&self) -> Option<(LayoutKind, &LayoutElement)> {
        match self {
            UiSchemaElement::VerticalLayout(layout) => Some((LayoutKind::Vertical, layout)),
            UiSchemaElement::HorizontalLayout(layout) => Some((LayoutKind::Horizontal, layout)),
            UiSchemaElement::Group(layout) => Some((LayoutKind::Group, layout)),
            UiSchemaElement::Categorization(layout) => Some((LayoutKind::Categorization, layout)),
            _ => None,
        }
    }

    /// Categories may only appear directly inside a categorization, and a
    /// categorization may only contain categories.
    pub fn validate_structure(&self) -> FormResult<()> {
        self.validate_nested(false)
    }

    fn validate_nested(&self, inside_categorization: bool) -> FormResult<()> {
        match self {
            UiSchemaElement::Category(category) => {
                if !inside_categorization {
                    return Err(FormError::InvalidUiSchema(format!(
                        "Category '{}' must be a direct child of a Categorization",
                        category.label
                    )));
                }
                for element in &category.elements {
                    element.validate_nested(false)?;
                }
                Ok(())
            }
            UiSchemaElement::Categorization(layout) => {
                for element in &layout.elements {
                    if !matches!(element, UiSchemaElement::Category(_)) {
                        return Err(FormError::InvalidUiSchema(
                            "Categorization may only contain Category elements".into(),
                        ));
                    }
                    element.validate_nested(true)?;
                }
                Ok(())
            }
            UiSchemaElement::VerticalLayout(layout)
            | UiSchemaElement::HorizontalLayout(layout)
            | UiSchemaElement::Group(layout) => {
                for element in &layout.elements {
                    element.validate_nested(false)?;
                }
                Ok(())
            }
            UiSchemaElement::Control(_) | UiSchemaElement::Label(_) => Ok(()),
        }
    }
}

impl ControlElement {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            label: None,
            options: ControlOptions::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_options(mut self, options: ControlOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<ControlElement> for UiSchemaElement {
    fn from(control: ControlElement) -> Self {
        UiSchemaElement::Control(control)
    }
}

// ── Options ──────────────────────────────────────────────────────────

/// The options bag of a control
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlOptions {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multi: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Options not interpreted by the engine
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ControlOptions {
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Merge with the property: control options win, the property's
    /// `format` fills an absent option format.
    pub fn merged_with(&self, property: &SchemaProperty) -> ControlOptions {
        let mut merged = self.clone();
        if merged.format.is_none() {
            merged.format = property.format.clone();
        }
        merged
    }

    pub fn rows(&self) -> u32 {
        self.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS)
    }

    pub fn accept(&self) -> &str {
        self.accept.as_deref().unwrap_or(DEFAULT_FILE_ACCEPT)
    }

    pub fn max_size(&self) -> u64 {
        self.max_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_vertical_layout() {
        let schema = JsonSchema::empty();
        let ui = UiSchemaElement::from_value(
            json!({
                "type": "VerticalLayout",
                "elements": [
                    {"type": "Control", "scope": "#/properties/decision"},
                    {"type": "Control", "scope": "#/properties/remarks", "options": {"multi": true}},
                    {"type": "Label", "text": "Notes"}
                ]
            }),
            &schema,
        )
        .unwrap();

        let (kind, layout) = ui.as_layout().unwrap();
        assert_eq!(kind, LayoutKind::Vertical);
        assert_eq!(layout.elements.len(), 3);
        match &layout.elements[1] {
            UiSchemaElement::Control(control) => {
                assert_eq!(control.scope, "#/properties/remarks");
                assert!(control.options.multi);
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_blank_ui_schema_defaults_to_property_order() {
        let schema = JsonSchema::empty()
            .with_property("qualityCheck", SchemaProperty::boolean())
            .with_property("batchNumber", SchemaProperty::string());

        for blank in [json!({}), Value::Null] {
            let ui = UiSchemaElement::from_value(blank, &schema).unwrap();
            let (kind, layout) = ui.as_layout().unwrap();
            assert_eq!(kind, LayoutKind::Vertical);
            let scopes: Vec<&str> = layout
                .elements
                .iter()
                .filter_map(|e| match e {
                    UiSchemaElement::Control(c) => Some(c.scope.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(scopes, vec!["#/properties/qualityCheck", "#/properties/batchNumber"]);
        }
    }

    #[test]
    fn test_unknown_element_type_rejected() {
        let result =
            UiSchemaElement::from_value(json!({"type": "Wizard", "elements": []}), &JsonSchema::empty());
        assert!(matches!(result, Err(FormError::InvalidUiSchema(_))));
    }

    #[test]
    fn test_category_outside_categorization_rejected() {
        let result = UiSchemaElement::from_value(
            json!({
                "type": "VerticalLayout",
                "elements": [{"type": "Category", "label": "Stray", "elements": []}]
            }),
            &JsonSchema::empty(),
        );
        assert!(matches!(result, Err(FormError::InvalidUiSchema(_))));
    }

    #[test]
    fn test_categorization_requires_categories() {
        let ui = UiSchemaElement::categorization(vec![UiSchemaElement::control("#/properties/a")]);
        assert!(ui.validate_structure().is_err());

        let ok = UiSchemaElement::categorization(vec![UiSchemaElement::category(
            "General",
            vec![UiSchemaElement::control("#/properties/a")],
        )]);
        assert!(ok.validate_structure().is_ok());
    }

    #[test]
    fn test_options_defaults_and_extra() {
        let options: ControlOptions =
            serde_json::from_value(json!({"format": "radio", "maxSize": 1024, "showUnfocusedDescription": true}))
                .unwrap();
        assert_eq!(options.format.as_deref(), Some("radio"));
        assert_eq!(options.max_size(), 1024);
        assert_eq!(options.accept(), DEFAULT_FILE_ACCEPT);
        assert_eq!(options.rows(), DEFAULT_TEXTAREA_ROWS);
        assert_eq!(options.extra.get("showUnfocusedDescription"), Some(&json!(true)));
    }

    #[test]
    fn test_merged_options_take_property_format() {
        let property = SchemaProperty::string().with_format("date");
        let merged = ControlOptions::default().merged_with(&property);
        assert_eq!(merged.format.as_deref(), Some("date"));

        let explicit = ControlOptions::default().with_format("radio").merged_with(&property);
        assert_eq!(explicit.format.as_deref(), Some("radio"));
    }
}
