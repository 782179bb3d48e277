//! Form values: a JSON-like tree that can also hold in-memory files
//!
//! Files picked by the user live in the tree as [`FileRef`]s until the
//! form is submitted, at which point each one is uploaded and replaced by
//! its storage key. Object key order is preserved.

use crate::{FieldPath, FormError, FormResult};
use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::{Number, Value};

// ── File References ──────────────────────────────────────────────────

/// A file selected by the user that has not been uploaded yet
#[derive(Clone, Debug, PartialEq)]
pub struct FileRef {
    /// Local identity, used to derive preview handles
    pub id: uuid::Uuid,
    pub name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl FileRef {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

// ── Value Tree ───────────────────────────────────────────────────────

/// A value held by a form field
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    File(FileRef),
    Array(Vec<FormValue>),
    Object(IndexMap<String, FormValue>),
}

impl FormValue {
    /// An empty object
    pub fn object() -> Self {
        FormValue::Object(IndexMap::new())
    }

    /// A number value; non-finite input becomes `Null`
    pub fn number(n: f64) -> Self {
        Number::from_f64(n).map_or(FormValue::Null, FormValue::Number)
    }

    /// Whether the value counts as "not provided": null, empty string or
    /// empty array
    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Null => true,
            FormValue::String(s) => s.is_empty(),
            FormValue::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            FormValue::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, FormValue>> {
        match self {
            FormValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Read the value at a path. Missing segments yield `None`.
    pub fn get_path(&self, path: &FieldPath) -> Option<&FormValue> {
        let mut current = self;
        for segment in path.segments() {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Write the value at a path, creating intermediate objects.
    ///
    /// A non-object value standing in the way of the path is replaced by
    /// an object.
    pub fn set_path(&mut self, path: &FieldPath, value: FormValue) {
        let Some((last, parents)) = path.segments().split_last() else {
            *self = value;
            return;
        };

        let mut current = self;
        for segment in parents {
            let map = current.ensure_object();
            current = map.entry(segment.clone()).or_insert_with(FormValue::object);
        }
        current.ensure_object().insert(last.clone(), value);
    }

    /// Remove the value at a path, returning it
    pub fn remove_path(&mut self, path: &FieldPath) -> Option<FormValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = match current {
                FormValue::Object(map) => map.get_mut(segment)?,
                _ => return None,
            };
        }
        match current {
            FormValue::Object(map) => map.shift_remove(last),
            _ => None,
        }
    }

    fn ensure_object(&mut self) -> &mut IndexMap<String, FormValue> {
        if !matches!(self, FormValue::Object(_)) {
            *self = FormValue::object();
        }
        match self {
            FormValue::Object(map) => map,
            _ => unreachable!("value was just replaced by an object"),
        }
    }

    /// Whether any file reference remains anywhere in the tree
    pub fn contains_files(&self) -> bool {
        match self {
            FormValue::File(_) => true,
            FormValue::Array(items) => items.iter().any(FormValue::contains_files),
            FormValue::Object(map) => map.values().any(FormValue::contains_files),
            _ => false,
        }
    }

    /// Convert to JSON. Fails if a file reference has not been replaced.
    pub fn to_json(&self) -> FormResult<Value> {
        Ok(match self {
            FormValue::Null => Value::Null,
            FormValue::Bool(b) => Value::Bool(*b),
            FormValue::Number(n) => Value::Number(n.clone()),
            FormValue::String(s) => Value::String(s.clone()),
            FormValue::File(file) => {
                return Err(FormError::UnresolvedFile {
                    name: file.name.clone(),
                })
            }
            FormValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(FormValue::to_json)
                    .collect::<FormResult<Vec<_>>>()?,
            ),
            FormValue::Object(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json()?);
                }
                Value::Object(object)
            }
        })
    }

    /// Short human form used in displays and logs
    pub fn display(&self) -> String {
        match self {
            FormValue::Null => String::new(),
            FormValue::Bool(b) => b.to_string(),
            FormValue::Number(n) => n.to_string(),
            FormValue::String(s) => s.clone(),
            FormValue::File(file) => file.name.clone(),
            other => other
                .to_json()
                .map(|json| json.to_string())
                .unwrap_or_default(),
        }
    }
}

impl Default for FormValue {
    fn default() -> Self {
        FormValue::Null
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(b) => FormValue::Bool(b),
            Value::Number(n) => FormValue::Number(n),
            Value::String(s) => FormValue::String(s),
            Value::Array(items) => FormValue::Array(items.into_iter().map(FormValue::from).collect()),
            Value::Object(map) => FormValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, FormValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::String(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::String(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(Number::from(n))
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::number(n)
    }
}

impl From<FileRef> for FormValue {
    fn from(file: FileRef) -> Self {
        FormValue::File(file)
    }
}
