//! JSON Schema subset describing form data
//!
//! Only the keywords the portals use are modelled. Unknown keywords are
//! ignored on load. A schema is checked for internal consistency with
//! [`JsonSchema::validate`] before any form is built from it.

use crate::{FieldPath, FormError, FormResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Types ────────────────────────────────────────────────────────────

/// The `type` keyword of a schema node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Integer,
    Boolean,
    Array,
    /// Non-standard marker for upload fields
    File,
}

impl SchemaType {
    pub fn is_numeric(self) -> bool {
        matches!(self, SchemaType::Number | SchemaType::Integer)
    }
}

/// One entry of a `oneOf` list: a constant with a display title
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneOfOption {
    #[serde(rename = "const")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A selectable value with its display label
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub value: Value,
    pub label: String,
}

/// Borrowed view of the object-level keywords shared by the root schema
/// and nested object properties
#[derive(Clone, Copy, Debug)]
pub struct ObjectShape<'a> {
    pub properties: &'a IndexMap<String, SchemaProperty>,
    pub required: &'a [String],
}

impl<'a> ObjectShape<'a> {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

// ── Root Schema ──────────────────────────────────────────────────────

/// The root schema of a form. Always describes an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type", default = "default_root_type")]
    pub schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, SchemaProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

fn default_root_type() -> SchemaType {
    SchemaType::Object
}

impl JsonSchema {
    /// An object schema without properties
    pub fn empty() -> Self {
        Self {
            schema_type: SchemaType::Object,
            title: None,
            description: None,
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Parse a schema from a JSON value and validate it
    pub fn from_value(value: Value) -> FormResult<Self> {
        let schema: JsonSchema = serde_json::from_value(value)
            .map_err(|e| FormError::InvalidSchema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn with_property(mut self, name: impl Into<String>, property: SchemaProperty) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn shape(&self) -> ObjectShape<'_> {
        ObjectShape {
            properties: &self.properties,
            required: &self.required,
        }
    }

    /// Look up the property a field path points at.
    ///
    /// Returns the property together with whether it is required by its
    /// immediate parent object.
    pub fn property_at(&self, path: &FieldPath) -> Option<(&SchemaProperty, bool)> {
        let mut shape = self.shape();
        let mut found: Option<(bool, &SchemaProperty)> = None;
        for segment in path.segments() {
            if let Some((_, parent)) = found {
                shape = parent.shape();
            }
            let property = shape.properties.get(segment)?;
            found = Some((shape.is_required(segment), property));
        }
        found.map(|(required, property)| (property, required))
    }

    /// Check the schema for internal consistency
    pub fn validate(&self) -> FormResult<()> {
        if self.schema_type != SchemaType::Object {
            return Err(FormError::InvalidSchema(
                "Root schema must be of type 'object'".into(),
            ));
        }
        validate_shape(self.shape(), "")
    }
}

impl Default for JsonSchema {
    fn default() -> Self {
        Self::empty()
    }
}

// ── Properties ───────────────────────────────────────────────────────

/// A property schema. Nested objects and arrays recurse through
/// `properties` and `items`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProperty {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<OneOfOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
}

impl SchemaProperty {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_one_of(mut self, options: Vec<(Value, &str)>) -> Self {
        self.one_of = Some(
            options
                .into_iter()
                .map(|(value, title)| OneOfOption {
                    value,
                    title: Some(title.to_string()),
                })
                .collect(),
        );
        self
    }

    pub fn with_bounds(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn with_multiple_of(mut self, step: f64) -> Self {
        self.multiple_of = Some(step);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, property: SchemaProperty) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn shape(&self) -> ObjectShape<'_> {
        ObjectShape {
            properties: &self.properties,
            required: &self.required,
        }
    }

    pub fn is_type(&self, schema_type: SchemaType) -> bool {
        self.schema_type == Some(schema_type)
    }

    pub fn is_numeric(&self) -> bool {
        self.schema_type.is_some_and(SchemaType::is_numeric)
    }

    /// Whether the property restricts its value to a declared set
    pub fn has_choices(&self) -> bool {
        self.one_of.is_some() || self.enum_values.is_some()
    }

    /// The declared choices. `oneOf` takes precedence over `enum`.
    pub fn choices(&self) -> Vec<Choice> {
        if let Some(one_of) = &self.one_of {
            return one_of
                .iter()
                .map(|option| Choice {
                    value: option.value.clone(),
                    label: option
                        .title
                        .clone()
                        .unwrap_or_else(|| literal_label(&option.value)),
                })
                .collect();
        }
        self.enum_values
            .iter()
            .flatten()
            .map(|value| Choice {
                value: value.clone(),
                label: literal_label(value),
            })
            .collect()
    }

    /// Whether a value is among the declared choices. Properties without
    /// choices allow everything.
    pub fn allows(&self, value: &Value) -> bool {
        if !self.has_choices() {
            return true;
        }
        self.choices().iter().any(|choice| &choice.value == value)
    }
}

/// Display form of a literal: strings without quotes, everything else as JSON
pub fn literal_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Validation ───────────────────────────────────────────────────────

fn validate_shape(shape: ObjectShape<'_>, prefix: &str) -> FormResult<()> {
    for name in shape.required {
        if !shape.properties.contains_key(name) {
            return Err(FormError::InvalidSchema(format!(
                "Required property '{}{}' is not declared in properties",
                prefix, name
            )));
        }
    }

    for (name, property) in shape.properties {
        let path = format!("{}{}", prefix, name);
        // Field paths are dotted, so a dot inside a name cannot be addressed
        if name.is_empty() || name.contains('.') {
            return Err(FormError::InvalidSchema(format!(
                "Property name '{}' must be non-empty and contain no '.'",
                path
            )));
        }
        validate_property(property, &path)?;
    }

    Ok(())
}

fn validate_property(property: &SchemaProperty, path: &str) -> FormResult<()> {
    if matches!(&property.enum_values, Some(values) if values.is_empty()) {
        return Err(FormError::InvalidSchema(format!(
            "Property '{}' declares an empty enum",
            path
        )));
    }
    if matches!(&property.one_of, Some(options) if options.is_empty()) {
        return Err(FormError::InvalidSchema(format!(
            "Property '{}' declares an empty oneOf",
            path
        )));
    }
    if let (Some(min), Some(max)) = (property.minimum, property.maximum) {
        if min > max {
            return Err(FormError::InvalidSchema(format!(
                "Property '{}' has minimum {} greater than maximum {}",
                path, min, max
            )));
        }
    }
    if matches!(property.multiple_of, Some(step) if step <= 0.0) {
        return Err(FormError::InvalidSchema(format!(
            "Property '{}' has a non-positive multipleOf",
            path
        )));
    }

    validate_shape(property.shape(), &format!("{}.", path))?;

    if let Some(items) = &property.items {
        validate_property(items, &format!("{}[]", path))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review_schema() -> JsonSchema {
        JsonSchema::from_value(json!({
            "type": "object",
            "required": ["decision"],
            "properties": {
                "decision": {
                    "type": "string",
                    "title": "Decision",
                    "oneOf": [
                        {"const": "APPROVED", "title": "Approved"},
                        {"const": "REJECTED", "title": "Rejected"}
                    ]
                },
                "remarks": {"type": "string"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_preserves_property_order() {
        let schema = review_schema();
        let names: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["decision", "remarks"]);
        assert!(schema.shape().is_required("decision"));
        assert!(!schema.shape().is_required("remarks"));
    }

    #[test]
    fn test_one_of_choices() {
        let schema = review_schema();
        let choices = schema.properties["decision"].choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].value, json!("APPROVED"));
        assert_eq!(choices[0].label, "Approved");
        assert_eq!(choices[1].value, json!("REJECTED"));
        assert_eq!(choices[1].label, "Rejected");
    }

    #[test]
    fn test_enum_choices_use_literal_labels() {
        let property =
            SchemaProperty::string().with_enum(vec![json!("Low"), json!("Medium"), json!(3)]);
        let labels: Vec<String> = property.choices().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Low", "Medium", "3"]);
        assert!(property.allows(&json!("Low")));
        assert!(!property.allows(&json!("High")));
    }

    #[test]
    fn test_allows_without_choices() {
        assert!(SchemaProperty::string().allows(&json!("anything")));
    }

    #[test]
    fn test_required_must_be_declared() {
        let result = JsonSchema::from_value(json!({
            "type": "object",
            "required": ["missing"],
            "properties": {"present": {"type": "string"}}
        }));
        assert!(matches!(result, Err(FormError::InvalidSchema(_))));
    }

    #[test]
    fn test_nested_required_must_be_declared() {
        let schema = JsonSchema::empty().with_property(
            "address",
            SchemaProperty::of_type(SchemaType::Object).with_required("city"),
        );
        assert!(matches!(schema.validate(), Err(FormError::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_empty_choices_and_bad_bounds() {
        let empty_enum = JsonSchema::empty().with_property("a", SchemaProperty::string().with_enum(vec![]));
        assert!(empty_enum.validate().is_err());

        let bad_bounds = JsonSchema::empty()
            .with_property("n", SchemaProperty::number().with_bounds(Some(10.0), Some(1.0)));
        assert!(bad_bounds.validate().is_err());

        let bad_step =
            JsonSchema::empty().with_property("n", SchemaProperty::number().with_multiple_of(0.0));
        assert!(bad_step.validate().is_err());
    }

    #[test]
    fn test_rejects_dotted_property_names() {
        let result = JsonSchema::from_value(json!({
            "type": "object",
            "required": ["hs.code"],
            "properties": {"hs.code": {"type": "string"}}
        }));
        assert!(matches!(result, Err(FormError::InvalidSchema(msg)) if msg.contains("hs.code")));

        let nested = JsonSchema::empty().with_property(
            "item",
            SchemaProperty::of_type(SchemaType::Object).with_property("hs.code", SchemaProperty::string()),
        );
        assert!(matches!(nested.validate(), Err(FormError::InvalidSchema(_))));
    }

    #[test]
    fn test_root_must_be_object() {
        let result = JsonSchema::from_value(json!({"type": "string"}));
        assert!(matches!(result, Err(FormError::InvalidSchema(_))));
    }

    #[test]
    fn test_property_at_nested() {
        let schema = JsonSchema::empty().with_property(
            "address",
            SchemaProperty::of_type(SchemaType::Object)
                .with_property("city", SchemaProperty::string().with_title("City"))
                .with_required("city"),
        );
        let path = FieldPath::parse("address.city").unwrap();
        let (property, required) = schema.property_at(&path).unwrap();
        assert_eq!(property.title.as_deref(), Some("City"));
        assert!(required);

        assert!(schema.property_at(&FieldPath::parse("address.zip").unwrap()).is_none());
        assert!(schema.property_at(&FieldPath::parse("city").unwrap()).is_none());
    }

    #[test]
    fn test_unknown_keywords_ignored() {
        let schema = JsonSchema::from_value(json!({
            "type": "object",
            "$schema": "http://json-schema.org/draft-07/schema#",
            "properties": {"a": {"type": "string", "pattern": "^x", "minLength": 1}}
        }))
        .unwrap();
        assert_eq!(schema.properties.len(), 1);
    }
}
