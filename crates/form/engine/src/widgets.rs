//! Field widgets
//!
//! A widget receives a field's props, turns input events into
//! [`FieldCommand`]s for the engine, and renders a [`WidgetView`].

use crate::dispatch::{dispatch, WidgetKind};
use crate::file_field::{check_file, FileRejection};
use crate::resolver::ResolvedControl;
use form_types::{FieldPath, FileRef, FormValue};

/// Everything a widget needs to know about its field
#[derive(Clone, Copy, Debug)]
pub struct FieldProps<'a> {
    pub control: &'a ResolvedControl,
    pub value: Option<&'a FormValue>,
    pub error: Option<&'a str>,
    pub touched: bool,
    /// Engine-wide read-only flag
    pub read_only: bool,
}

impl<'a> FieldProps<'a> {
    /// Read-only if either the engine or the control says so
    pub fn is_read_only(&self) -> bool {
        self.read_only || self.control.options.readonly
    }

    /// The validation message, once the field has been touched
    pub fn visible_error(&self) -> Option<&'a str> {
        if self.touched {
            self.error
        } else {
            None
        }
    }
}

/// User input delivered to a widget
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEvent {
    /// Raw text from a text, number, date or select input
    Input(String),
    Toggle(bool),
    Blur,
    FileSelected(FileRef),
    FileRemoved,
}

/// A state change requested by a widget
#[derive(Clone, Debug, PartialEq)]
pub enum FieldCommand {
    SetValue { path: FieldPath, value: FormValue },
    SetTouched { path: FieldPath, touched: bool },
}

impl FieldCommand {
    pub fn path(&self) -> &FieldPath {
        match self {
            FieldCommand::SetValue { path, .. } | FieldCommand::SetTouched { path, .. } => path,
        }
    }
}

/// Render-ready description of a field
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetView {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub description: Option<String>,
    pub kind: WidgetKind,
    /// Text shown in the input
    pub display: String,
    pub checked: bool,
    /// Index of the chosen option of a select
    pub selected: Option<usize>,
    pub disabled: bool,
    /// Shown only once the field is touched
    pub error: Option<String>,
}

/// The widget bound to one control
#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    kind: WidgetKind,
}

impl Widget {
    pub fn for_control(control: &ResolvedControl) -> Self {
        Self {
            kind: dispatch(control),
        }
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    /// Translate an event into a command. Read-only fields and events that
    /// do not apply to this widget yield `Ok(None)`; a file outside the
    /// control's limits yields the rejection.
    pub fn handle(
        &self,
        props: &FieldProps<'_>,
        event: WidgetEvent,
    ) -> Result<Option<FieldCommand>, FileRejection> {
        if props.is_read_only() {
            return Ok(None);
        }
        if let (WidgetKind::File { accept, max_size }, WidgetEvent::FileSelected(file)) = (&self.kind, &event) {
            check_file(file, accept, *max_size)?;
        }
        Ok(self.command(props, event))
    }

    fn command(&self, props: &FieldProps<'_>, event: WidgetEvent) -> Option<FieldCommand> {
        let path = props.control.path.clone();

        if let WidgetEvent::Blur = event {
            return Some(FieldCommand::SetTouched {
                path,
                touched: true,
            });
        }

        let value = match (&self.kind, event) {
            (WidgetKind::Checkbox, WidgetEvent::Toggle(checked)) => FormValue::Bool(checked),
            (WidgetKind::Select { options, .. }, WidgetEvent::Input(key)) => {
                if key.is_empty() {
                    FormValue::String(String::new())
                } else {
                    let option = options.iter().find(|o| o.key() == key)?;
                    FormValue::from(option.value.clone())
                }
            }
            (WidgetKind::Number { .. }, WidgetEvent::Input(raw)) => parse_number_input(&raw)?,
            (WidgetKind::Date { .. }, WidgetEvent::Input(text))
            | (WidgetKind::TextArea { .. }, WidgetEvent::Input(text))
            | (WidgetKind::Text { .. }, WidgetEvent::Input(text)) => FormValue::String(text),
            (WidgetKind::File { .. }, WidgetEvent::FileSelected(file)) => FormValue::File(file),
            (WidgetKind::File { .. }, WidgetEvent::FileRemoved) => FormValue::Null,
            _ => return None,
        };

        Some(FieldCommand::SetValue { path, value })
    }

    /// Render the field
    pub fn view(&self, props: &FieldProps<'_>) -> WidgetView {
        let control = props.control;
        let value = props.value;

        let selected = match (&self.kind, value) {
            (WidgetKind::Select { options, .. }, Some(current)) => {
                let current = current.to_json().ok();
                options
                    .iter()
                    .position(|o| Some(&o.value) == current.as_ref())
            }
            _ => None,
        };

        let display = match (&self.kind, value) {
            (WidgetKind::Select { options, .. }, _) => selected
                .and_then(|i| options.get(i))
                .map(|o| o.label.clone())
                .unwrap_or_default(),
            (WidgetKind::File { .. }, Some(v)) => file_display_name(v).unwrap_or_default(),
            (_, Some(v)) => v.display(),
            (_, None) => String::new(),
        };

        WidgetView {
            name: control.name(),
            label: control.label.clone(),
            required: control.required,
            description: control.description().map(str::to_string),
            kind: self.kind.clone(),
            display,
            checked: value.and_then(FormValue::as_bool).unwrap_or(false),
            selected,
            disabled: props.is_read_only(),
            error: props.visible_error().map(str::to_string),
        }
    }
}

/// Empty input stores `""`; anything that does not parse is ignored
fn parse_number_input(raw: &str) -> Option<FormValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(FormValue::String(String::new()));
    }
    let number: f64 = trimmed.parse().ok().filter(|n: &f64| n.is_finite())?;
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Some(FormValue::from(number as i64))
    } else {
        Some(FormValue::number(number))
    }
}

/// Name shown for a file value: the file's name, or the last segment of a
/// stored key
pub fn file_display_name(value: &FormValue) -> Option<String> {
    match value {
        FormValue::File(file) => Some(file.name.clone()),
        FormValue::String(key) if !key.is_empty() => {
            let last = key.rsplit('/').next().filter(|s| !s.is_empty());
            Some(last.unwrap_or(key).to_string())
        }
        _ => None,
    }
}
