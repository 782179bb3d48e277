//! Field paths derived from control scopes
//!
//! A control scope is a JSON Pointer into the schema such as
//! `#/properties/address/properties/city`. The data path of that control
//! is the list of property names along the pointer (`address.city`).

use crate::{FormError, FormResult};
use serde::{Deserialize, Serialize};

/// The data path of a field, one segment per nested property
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Build a path from explicit segments
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a dotted path (`address.city`)
    pub fn parse(path: &str) -> FormResult<Self> {
        if path.is_empty() {
            return Err(FormError::UnknownField(path.to_string()));
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(FormError::UnknownField(path.to_string()));
        }
        Ok(Self(segments))
    }

    /// Derive a path from a control scope pointer
    pub fn from_scope(scope: &str) -> FormResult<Self> {
        let invalid = |reason: &str| FormError::InvalidScope {
            scope: scope.to_string(),
            reason: reason.to_string(),
        };

        let pointer = scope
            .strip_prefix("#/")
            .ok_or_else(|| invalid("scope must start with '#/'"))?;

        let raw: Vec<&str> = pointer.split('/').collect();
        if raw.len() % 2 != 0 {
            return Err(invalid("expected alternating 'properties/<name>' segments"));
        }

        let mut segments = Vec::with_capacity(raw.len() / 2);
        for pair in raw.chunks(2) {
            if pair[0] != "properties" {
                return Err(invalid("only 'properties' segments are supported"));
            }
            let name = unescape_pointer_token(pair[1]);
            if name.is_empty() {
                return Err(invalid("empty property name"));
            }
            segments.push(name);
        }

        Ok(Self(segments))
    }

    /// Render the scope pointer for this path
    pub fn to_scope(&self) -> String {
        let mut scope = String::from("#");
        for segment in &self.0 {
            scope.push_str("/properties/");
            scope.push_str(&escape_pointer_token(segment));
        }
        scope
    }

    /// The path segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The last segment: the property name of the field
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
