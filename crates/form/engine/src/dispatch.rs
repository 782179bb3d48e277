//! Widget dispatch
//!
//! Every control maps to exactly one widget kind. Rules are tried in the
//! order of [`DISPATCH_RULES`]; the first match wins and plain text is the
//! fallback.

use crate::resolver::ResolvedControl;
use form_types::{literal_label, SchemaType};
use serde_json::Value;

/// Placeholder of select widgets without an explicit one
pub const DEFAULT_SELECT_PLACEHOLDER: &str = "Select an option";

/// Formats that mark a string property as a file upload
const FILE_FORMATS: &[&str] = &["file", "data-url", "binary"];

// ── Widget Kinds ─────────────────────────────────────────────────────

/// The concrete widget a control renders as
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    File { accept: String, max_size: u64 },
    Checkbox,
    Select { options: Vec<SelectOption>, placeholder: String },
    Date { with_time: bool },
    Number { min: Option<f64>, max: Option<f64>, step: Step },
    TextArea { rows: u32 },
    Text { mode: TextMode },
}

impl WidgetKind {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::File { .. } => "file",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Select { .. } => "select",
            WidgetKind::Date { .. } => "date",
            WidgetKind::Number { .. } => "number",
            WidgetKind::TextArea { .. } => "textarea",
            WidgetKind::Text { .. } => "text",
        }
    }
}

/// One entry of a select widget
#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    /// The declared literal, stored as-is when chosen
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    /// String form used to match user input against the option
    pub fn key(&self) -> String {
        literal_label(&self.value)
    }
}

/// Step of a number input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Fixed(f64),
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextMode {
    Plain,
    Email,
}

// ── Rules ────────────────────────────────────────────────────────────

/// A dispatch rule: a predicate and the widget it produces
pub struct DispatchRule {
    pub name: &'static str,
    pub matches: fn(&ResolvedControl) -> bool,
    pub build: fn(&ResolvedControl) -> WidgetKind,
}

/// Rules in precedence order
pub const DISPATCH_RULES: &[DispatchRule] = &[
    DispatchRule {
        name: "file",
        matches: is_file,
        build: file_widget,
    },
    DispatchRule {
        name: "boolean",
        matches: is_boolean,
        build: checkbox_widget,
    },
    DispatchRule {
        name: "select",
        matches: is_select,
        build: select_widget,
    },
    DispatchRule {
        name: "date",
        matches: is_date,
        build: date_widget,
    },
    DispatchRule {
        name: "number",
        matches: is_number,
        build: number_widget,
    },
    DispatchRule {
        name: "textarea",
        matches: is_multiline,
        build: textarea_widget,
    },
];

/// Pick the widget for a control
pub fn dispatch(control: &ResolvedControl) -> WidgetKind {
    for rule in DISPATCH_RULES {
        if (rule.matches)(control) {
            tracing::trace!(field = %control.path, rule = rule.name, "Widget dispatched");
            return (rule.build)(control);
        }
    }
    text_widget(control)
}

fn option_format(control: &ResolvedControl) -> Option<&str> {
    control.options.format.as_deref()
}

fn is_file(control: &ResolvedControl) -> bool {
    control.property.is_type(SchemaType::File)
        || option_format(control).is_some_and(|f| FILE_FORMATS.contains(&f))
        || control.options.accept.is_some()
        || control.options.max_size.is_some()
}

fn is_boolean(control: &ResolvedControl) -> bool {
    control.property.is_type(SchemaType::Boolean)
}

fn is_select(control: &ResolvedControl) -> bool {
    control.property.has_choices()
}

fn is_date(control: &ResolvedControl) -> bool {
    matches!(option_format(control), Some("date") | Some("date-time"))
}

fn is_number(control: &ResolvedControl) -> bool {
    control.property.is_numeric()
}

fn is_multiline(control: &ResolvedControl) -> bool {
    control.options.multi
}

fn file_widget(control: &ResolvedControl) -> WidgetKind {
    WidgetKind::File {
        accept: control.options.accept().to_string(),
        max_size: control.options.max_size(),
    }
}

fn checkbox_widget(_: &ResolvedControl) -> WidgetKind {
    WidgetKind::Checkbox
}

fn select_widget(control: &ResolvedControl) -> WidgetKind {
    WidgetKind::Select {
        options: control
            .property
            .choices()
            .into_iter()
            .map(|choice| SelectOption {
                value: choice.value,
                label: choice.label,
            })
            .collect(),
        placeholder: control
            .options
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_SELECT_PLACEHOLDER.to_string()),
    }
}

fn date_widget(control: &ResolvedControl) -> WidgetKind {
    WidgetKind::Date {
        with_time: option_format(control) == Some("date-time"),
    }
}

fn number_widget(control: &ResolvedControl) -> WidgetKind {
    let property = &control.property;
    let step = match property.multiple_of {
        Some(step) => Step::Fixed(step),
        None if property.is_type(SchemaType::Integer) => Step::Fixed(1.0),
        None => Step::Any,
    };
    WidgetKind::Number {
        min: property.minimum,
        max: property.maximum,
        step,
    }
}

fn textarea_widget(control: &ResolvedControl) -> WidgetKind {
    WidgetKind::TextArea {
        rows: control.options.rows(),
    }
}

fn text_widget(control: &ResolvedControl) -> WidgetKind {
    let mode = match option_format(control) {
        Some("email") => TextMode::Email,
        _ => TextMode::Plain,
    };
    WidgetKind::Text { mode }
}
