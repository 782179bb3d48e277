//! Field validation
//!
//! Produces at most one message per field. Checks run in order: required,
//! numeric type and range, then declared choices.

use crate::resolver::ResolvedControl;
use form_types::{FormValue, SchemaType};
use std::collections::BTreeMap;

/// Validation messages keyed by dotted field path
pub type FieldErrors = BTreeMap<String, String>;

pub const REQUIRED_MESSAGE: &str = "is a required property";
pub const NUMBER_MESSAGE: &str = "must be number";
pub const INTEGER_MESSAGE: &str = "must be integer";
pub const CHOICE_MESSAGE: &str = "must be equal to one of the allowed values";

/// Validate every control against the current values
pub fn validate_controls(controls: &[ResolvedControl], values: &FormValue) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for control in controls {
        let name = control.name();
        if errors.contains_key(&name) {
            continue;
        }
        if let Some(message) = validate_control(control, values.get_path(&control.path)) {
            errors.insert(name, message);
        }
    }
    errors
}

/// Validate one control's value; `None` means valid
pub fn validate_control(control: &ResolvedControl, value: Option<&FormValue>) -> Option<String> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            return control.required.then(|| REQUIRED_MESSAGE.to_string());
        }
    };

    let property = &control.property;

    if property.is_numeric() {
        let number = match numeric_value(value) {
            Some(n) => n,
            None => {
                return Some(if property.is_type(SchemaType::Integer) {
                    INTEGER_MESSAGE.to_string()
                } else {
                    NUMBER_MESSAGE.to_string()
                });
            }
        };
        if property.is_type(SchemaType::Integer) && number.fract() != 0.0 {
            return Some(INTEGER_MESSAGE.to_string());
        }
        if let Some(min) = property.minimum {
            if number < min {
                return Some(format!("must be >= {}", min));
            }
        }
        if let Some(max) = property.maximum {
            if number > max {
                return Some(format!("must be <= {}", max));
            }
        }
        if let Some(step) = property.multiple_of {
            let ratio = number / step;
            if (ratio - ratio.round()).abs() > 1e-9 {
                return Some(format!("must be multiple of {}", step));
            }
        }
    }

    if property.has_choices() {
        let allowed = match value.to_json() {
            Ok(json) => property.allows(&json),
            Err(_) => false,
        };
        if !allowed {
            return Some(CHOICE_MESSAGE.to_string());
        }
    }

    None
}

/// Numbers, and strings holding a number, coerce to `f64`
fn numeric_value(value: &FormValue) -> Option<f64> {
    match value {
        FormValue::Number(n) => n.as_f64(),
        FormValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
