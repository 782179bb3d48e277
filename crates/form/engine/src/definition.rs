//! Form definitions: a validated schema / UI-schema pair

use crate::resolver::{resolve, ResolvedControl};
use form_types::{FieldPath, FormResult, FormValue, JsonSchema, SchemaProperty, UiSchemaElement};
use indexmap::IndexMap;
use serde_json::Value;

/// A schema and UI schema together with the controls they resolve to
#[derive(Clone, Debug, PartialEq)]
pub struct FormDefinition {
    schema: JsonSchema,
    ui_schema: UiSchemaElement,
    controls: Vec<ResolvedControl>,
    tabs: Vec<String>,
}

impl FormDefinition {
    /// Build a definition. Fails if the schema is inconsistent, the UI
    /// schema is malformed, or a control scope does not resolve.
    pub fn new(schema: JsonSchema, ui_schema: UiSchemaElement) -> FormResult<Self> {
        schema.validate()?;
        ui_schema.validate_structure()?;
        let controls = resolve(&schema, &ui_schema)?;
        let tabs = collect_tabs(&ui_schema);

        tracing::debug!(
            controls = controls.len(),
            tabs = tabs.len(),
            "Form definition resolved"
        );

        Ok(Self {
            schema,
            ui_schema,
            controls,
            tabs,
        })
    }

    /// Build a definition from raw JSON. A blank UI schema (`{}` or `null`)
    /// lays out every schema property vertically.
    pub fn from_json(schema: Value, ui_schema: Value) -> FormResult<Self> {
        let schema = JsonSchema::from_value(schema)?;
        let ui_schema = UiSchemaElement::from_value(ui_schema, &schema)?;
        Self::new(schema, ui_schema)
    }

    pub fn schema(&self) -> &JsonSchema {
        &self.schema
    }

    pub fn ui_schema(&self) -> &UiSchemaElement {
        &self.ui_schema
    }

    /// Resolved controls in document order
    pub fn controls(&self) -> &[ResolvedControl] {
        &self.controls
    }

    /// Labels of every category, in document order
    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    /// The first control bound to `path`
    pub fn control(&self, path: &FieldPath) -> Option<&ResolvedControl> {
        self.controls.iter().find(|c| &c.path == path)
    }

    /// Controls shown for the given active tab
    pub fn visible_controls(&self, active_tab: Option<&str>) -> Vec<&ResolvedControl> {
        self.controls
            .iter()
            .filter(|c| c.is_visible(active_tab, &self.tabs))
            .collect()
    }

    /// Whether a path points at a property declared by the schema
    pub fn is_known_path(&self, path: &FieldPath) -> bool {
        self.schema.property_at(path).is_some()
    }

    /// Keep only the entries of `values` that the schema declares.
    ///
    /// Nested objects are filtered against their declared properties;
    /// objects whose property declares none are kept whole.
    pub fn retain_known(&self, values: FormValue) -> FormValue {
        match values {
            FormValue::Object(map) => FormValue::Object(retain_in(&self.schema.properties, map)),
            _ => FormValue::object(),
        }
    }
}

fn retain_in(
    properties: &IndexMap<String, SchemaProperty>,
    map: IndexMap<String, FormValue>,
) -> IndexMap<String, FormValue> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let Some(property) = properties.get(&key) else {
                tracing::debug!(field = %key, "Dropping value for undeclared field");
                return None;
            };
            let value = match value {
                FormValue::Object(nested) if !property.properties.is_empty() => {
                    FormValue::Object(retain_in(&property.properties, nested))
                }
                other => other,
            };
            Some((key, value))
        })
        .collect()
}

fn collect_tabs(element: &UiSchemaElement) -> Vec<String> {
    let mut tabs = Vec::new();
    let mut stack = vec![element];
    while let Some(element) = stack.pop() {
        match element {
            UiSchemaElement::Category(category) => {
                tabs.push(category.label.clone());
                stack.extend(category.elements.iter().rev());
            }
            other => {
                if let Some((_, layout)) = other.as_layout() {
                    stack.extend(layout.elements.iter().rev());
                }
            }
        }
    }
    tabs
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_types::FormError;
    use serde_json::json;

    fn oga_definition() -> FormDefinition {
        FormDefinition::from_json(
            json!({
                "type": "object",
                "required": ["decision"],
                "properties": {
                    "decision": {"type": "string", "enum": ["APPROVED", "REJECTED"]},
                    "remarks": {"type": "string"},
                    "inspection": {
                        "type": "object",
                        "properties": {"temperature": {"type": "number"}}
                    }
                }
            }),
            json!({
                "type": "Categorization",
                "elements": [
                    {"type": "Category", "label": "Decision", "elements": [
                        {"type": "Control", "scope": "#/properties/decision"},
                        {"type": "Control", "scope": "#/properties/remarks", "options": {"multi": true}}
                    ]},
                    {"type": "Category", "label": "Inspection", "elements": [
                        {"type": "Control", "scope": "#/properties/inspection/properties/temperature"}
                    ]}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_tabs_and_visibility() {
        let definition = oga_definition();
        assert_eq!(definition.tabs(), &["Decision".to_string(), "Inspection".to_string()]);

        let first: Vec<String> = definition.visible_controls(None).iter().map(|c| c.name()).collect();
        assert_eq!(first, vec!["decision", "remarks"]);

        let second: Vec<String> = definition
            .visible_controls(Some("Inspection"))
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(second, vec!["inspection.temperature"]);
    }

    #[test]
    fn test_unresolved_scope_fails_at_construction() {
        let result = FormDefinition::from_json(
            json!({"type": "object", "properties": {"a": {"type": "string"}}}),
            json!({"type": "Control", "scope": "#/properties/b"}),
        );
        assert!(matches!(result, Err(FormError::UnresolvedScope { .. })));
    }

    #[test]
    fn test_dotted_property_name_fails_at_construction() {
        let result = FormDefinition::from_json(
            json!({
                "type": "object",
                "required": ["hs.code"],
                "properties": {"hs.code": {"type": "string"}}
            }),
            json!(null),
        );
        assert!(matches!(result, Err(FormError::InvalidSchema(_))));
    }

    #[test]
    fn test_retain_known_drops_undeclared_fields() {
        let definition = oga_definition();
        let seeded = definition.retain_known(FormValue::from(json!({
            "decision": "APPROVED",
            "legacyField": 1,
            "inspection": {"temperature": 4.5, "sensor": "x"}
        })));
        assert_eq!(
            seeded.to_json().unwrap(),
            json!({"decision": "APPROVED", "inspection": {"temperature": 4.5}})
        );
    }

    #[test]
    fn test_known_paths() {
        let definition = oga_definition();
        assert!(definition.is_known_path(&FieldPath::parse("inspection.temperature").unwrap()));
        assert!(!definition.is_known_path(&FieldPath::parse("inspection.humidity").unwrap()));
    }
}
