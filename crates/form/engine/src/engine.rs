//! The form engine
//!
//! [`FormEngine`] owns one form's state. Field updates re-validate
//! immediately; messages become visible per field once it is touched.
//! [`FormEngine::handle_submit`] runs validate → upload files → hand off,
//! admitting one submission at a time.

use crate::definition::FormDefinition;
use crate::handlers::{FileUploader, NoUploader, SubmitHandler};
use crate::resolver::ResolvedControl;
use crate::sample_data::SampleData;
use crate::state::FormState;
use crate::transform::replace_files_with_keys;
use crate::validation::{validate_controls, FieldErrors};
use crate::view::FormView;
use crate::widgets::{FieldCommand, FieldProps, Widget, WidgetEvent};
use crate::SubmitError;
use form_types::{FieldPath, FormError, FormResult, FormValue};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a submit attempt
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// The handler accepted the values
    Submitted,
    /// Validation failed; every field is now touched
    Invalid(FieldErrors),
    /// Another submission is still in flight
    Busy,
    /// Upload or hand-off failed; the message is kept as `submit_error`
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Schema-driven form state machine
pub struct FormEngine {
    definition: Arc<FormDefinition>,
    initial_values: FormValue,
    state: Mutex<FormState>,
    submitting: AtomicBool,
    read_only: bool,
    uploader: Arc<dyn FileUploader>,
    handler: Arc<dyn SubmitHandler>,
}

impl FormEngine {
    pub fn new(definition: FormDefinition, handler: Arc<dyn SubmitHandler>) -> Self {
        let definition = Arc::new(definition);
        let initial_values = FormValue::object();
        let state = Mutex::new(Self::fresh_state(&definition, initial_values.clone()));
        Self {
            definition,
            initial_values,
            state,
            submitting: AtomicBool::new(false),
            read_only: false,
            uploader: Arc::new(NoUploader),
            handler,
        }
    }

    /// Seed the form. Entries the schema does not declare are dropped.
    pub fn with_initial_values(mut self, values: impl Into<FormValue>) -> Self {
        self.initial_values = self.definition.retain_known(values.into());
        self.state = Mutex::new(Self::fresh_state(&self.definition, self.initial_values.clone()));
        self
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn FileUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    /// Lock every field against user edits
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn fresh_state(definition: &FormDefinition, values: FormValue) -> FormState {
        let mut state = FormState::new(values);
        state.errors = validate_controls(definition.controls(), &state.values);
        state
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn controls(&self) -> &[ResolvedControl] {
        self.definition.controls()
    }

    pub fn uploader(&self) -> &dyn FileUploader {
        self.uploader.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> FormState {
        self.state.lock().clone()
    }

    pub fn values(&self) -> FormValue {
        self.state.lock().values.clone()
    }

    pub fn value(&self, path: &str) -> FormResult<Option<FormValue>> {
        let path = self.known_path(path)?;
        Ok(self.state.lock().value(&path).cloned())
    }

    pub fn touched(&self) -> BTreeMap<String, bool> {
        self.state.lock().touched.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.state.lock().errors.clone()
    }

    /// The message to show for a field, if it is touched and invalid
    pub fn visible_error(&self, path: &str) -> FormResult<Option<String>> {
        let path = self.known_path(path)?;
        Ok(self.state.lock().visible_error(&path).map(str::to_string))
    }

    pub fn submit_error(&self) -> Option<String> {
        self.state.lock().submit_error.clone()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    fn known_path(&self, path: &str) -> FormResult<FieldPath> {
        let parsed = FieldPath::parse(path)?;
        if !self.definition.is_known_path(&parsed) {
            return Err(FormError::UnknownField(path.to_string()));
        }
        Ok(parsed)
    }

    /// Set a field's value and re-validate
    pub fn set_value(&self, path: &str, value: impl Into<FormValue>) -> FormResult<()> {
        let path = self.known_path(path)?;
        self.write_value(&path, value.into());
        Ok(())
    }

    fn write_value(&self, path: &FieldPath, value: FormValue) {
        let mut state = self.state.lock();
        state.values.set_path(path, value);
        state.errors = validate_controls(self.definition.controls(), &state.values);
    }

    pub fn set_touched(&self, path: &str, touched: bool) -> FormResult<()> {
        let path = self.known_path(path)?;
        self.state.lock().touched.insert(path.to_string(), touched);
        Ok(())
    }

    /// Apply a command produced by a widget
    pub fn apply(&self, command: FieldCommand) -> FormResult<()> {
        if !self.definition.is_known_path(command.path()) {
            return Err(FormError::UnknownField(command.path().to_string()));
        }
        match command {
            FieldCommand::SetValue { path, value } => self.write_value(&path, value),
            FieldCommand::SetTouched { path, touched } => {
                self.state.lock().touched.insert(path.to_string(), touched);
            }
        }
        Ok(())
    }

    /// Route a widget event for a field through its widget.
    ///
    /// Returns whether the event changed the state. A file outside the
    /// control's limits fails with [`FormError::FileRejected`] and leaves
    /// the field as it was.
    pub fn dispatch_event(&self, path: &str, event: WidgetEvent) -> FormResult<bool> {
        let path = self.known_path(path)?;
        let control = self
            .definition
            .control(&path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;

        let command = {
            let state = self.state.lock();
            let props = FieldProps {
                control,
                value: state.value(&path),
                error: state.error(&path),
                touched: state.is_touched(&path),
                read_only: self.read_only,
            };
            Widget::for_control(control).handle(&props, event)
        };

        let command = command.map_err(|rejection| {
            tracing::debug!(field = %path, reason = %rejection, "File rejected");
            FormError::FileRejected {
                field: path.to_string(),
                reason: rejection.to_string(),
            }
        })?;

        match command {
            Some(command) => {
                self.apply(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-run validation and return the messages
    pub fn validate(&self) -> FieldErrors {
        let mut state = self.state.lock();
        state.errors = validate_controls(self.definition.controls(), &state.values);
        state.errors.clone()
    }

    /// Restore the initial values and clear touched flags and messages
    pub fn reset(&self) {
        *self.state.lock() = Self::fresh_state(&self.definition, self.initial_values.clone());
    }

    /// Fill fields from a sample set.
    ///
    /// Only fields whose name has a sample are written. Non-empty values are
    /// kept unless `force` is set. Returns how many fields were written.
    pub fn auto_fill(&self, samples: &SampleData, set: usize, force: bool) -> usize {
        if self.read_only {
            return 0;
        }
        let mut state = self.state.lock();
        let mut filled = 0;
        for control in self.definition.controls() {
            let Some(sample) = samples.value_for(control.path.name(), set) else {
                continue;
            };
            let occupied = state
                .values
                .get_path(&control.path)
                .is_some_and(|v| !v.is_empty());
            if occupied && !force {
                continue;
            }
            state.values.set_path(&control.path, FormValue::from(sample.clone()));
            filled += 1;
        }
        state.errors = validate_controls(self.definition.controls(), &state.values);
        tracing::debug!(filled, set, "Form auto-filled from samples");
        filled
    }

    /// Render the layout tree for the current state
    pub fn view(&self, active_tab: Option<&str>) -> FormResult<FormView> {
        let state = self.state.lock();
        FormView::build(&self.definition, &state, self.read_only, active_tab)
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate, upload files and hand the values to the submit handler.
    ///
    /// While one submission is in flight further calls return
    /// [`SubmitOutcome::Busy`] without side effects. Values are never
    /// cleared, whatever the outcome.
    pub async fn handle_submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Submit ignored, another submission is in flight");
            return SubmitOutcome::Busy;
        }
        let _admission = Admission(&self.submitting);

        let values = {
            let mut state = self.state.lock();
            state.errors = validate_controls(self.definition.controls(), &state.values);
            if !state.errors.is_empty() {
                for control in self.definition.controls() {
                    state.touched.insert(control.name(), true);
                }
                tracing::info!(errors = state.errors.len(), "Form submission blocked by validation");
                return SubmitOutcome::Invalid(state.errors.clone());
            }
            state.submit_error = None;
            state.values.clone()
        };

        let payload = match replace_files_with_keys(&values, self.uploader.as_ref()).await {
            Ok(payload) => payload,
            Err(err) => return self.fail(err),
        };

        match self.handler.submit(payload).await {
            Ok(()) => {
                tracing::info!("Form submitted");
                SubmitOutcome::Submitted
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&self, err: SubmitError) -> SubmitOutcome {
        tracing::warn!(error = %err, "Form submission failed");
        self.state.lock().submit_error = Some(err.to_string());
        SubmitOutcome::Failed(err)
    }
}

/// Releases the submit slot when the submission ends or is dropped
struct Admission<'a>(&'a AtomicBool);

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
