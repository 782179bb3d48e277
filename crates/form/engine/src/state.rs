//! Form state

use crate::validation::FieldErrors;
use form_types::{FieldPath, FormValue};
use std::collections::BTreeMap;

/// Values, touched flags and validation messages of one form instance
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub values: FormValue,
    pub touched: BTreeMap<String, bool>,
    pub errors: FieldErrors,
    /// Message of the last failed submission
    pub submit_error: Option<String>,
}

impl FormState {
    pub fn new(values: FormValue) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn value(&self, path: &FieldPath) -> Option<&FormValue> {
        self.values.get_path(path)
    }

    pub fn is_touched(&self, path: &FieldPath) -> bool {
        self.touched.get(&path.to_string()).copied().unwrap_or(false)
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(&path.to_string()).map(String::as_str)
    }

    /// The error to show for a field: only once the field has been touched
    pub fn visible_error(&self, path: &FieldPath) -> Option<&str> {
        if self.is_touched(path) {
            self.error(path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_hidden_until_touched() {
        let path = FieldPath::parse("decision").unwrap();
        let mut state = FormState::new(FormValue::object());
        state.errors.insert("decision".into(), "is a required property".into());

        assert_eq!(state.error(&path), Some("is a required property"));
        assert_eq!(state.visible_error(&path), None);

        state.touched.insert("decision".into(), true);
        assert_eq!(state.visible_error(&path), Some("is a required property"));
    }
}
