//! Add/edit form lifecycle.
//!
//! One form is reused for creating and editing. Every open resets fields and
//! errors, so nothing typed for one record can show up for another.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::controller::list::{RecordListController, WriteOutcome};
use crate::models::{Field, Record, RecordFields};
use crate::validation::{FieldErrors, validate};

/// What a submit will do. `Edit` holds the record as it was when the form
/// opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Create,
    Edit(Record),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub mode: FormMode,
    pub fields: RecordFields,
    pub field_errors: FieldErrors,
    pub is_open: bool,
}

impl FormState {
    pub fn open_create(&mut self) {
        *self = Self {
            is_open: true,
            ..Self::default()
        };
    }

    pub fn open_edit(&mut self, record: Record) {
        *self = Self {
            fields: record.fields(),
            mode: FormMode::Edit(record),
            field_errors: FieldErrors::default(),
            is_open: true,
        };
    }

    pub fn update_field(&mut self, field: Field, value: String) {
        self.fields.set(field, value);
    }

    /// Hides the form. Fields are left as they are and reset on the next open.
    pub fn cancel(&mut self) {
        self.is_open = false;
    }

    pub fn reject(&mut self, errors: FieldErrors) {
        self.field_errors = errors;
    }

    pub fn close_after_save(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Saved,
    Invalid { errors: FieldErrors },
    /// The store refused the write; the form stays open with its input.
    Rejected { message: String },
    /// Nothing was sent: the form is closed or a submit is already running.
    Ignored,
}

pub struct FormController {
    state: watch::Sender<FormState>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self { state }
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn open_create(&self) {
        self.state.send_modify(FormState::open_create);
    }

    pub fn open_edit(&self, record: Record) {
        debug!("editing record {}", record.id);
        self.state.send_modify(|state| state.open_edit(record));
    }

    /// Returns `false` and leaves the fields alone when the form is closed.
    pub fn update_field(&self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        self.state.send_if_modified(|state| {
            if !state.is_open {
                return false;
            }
            state.update_field(field, value);
            true
        })
    }

    pub fn cancel(&self) {
        self.state.send_modify(FormState::cancel);
    }

    pub async fn submit(&self, records: &RecordListController) -> SubmitOutcome {
        let (mode, fields) = {
            let state = self.state.borrow();
            if !state.is_open {
                debug!("submit on a closed form ignored");
                return SubmitOutcome::Ignored;
            }
            (state.mode.clone(), state.fields.clone())
        };

        let errors = validate(&fields);
        if !errors.is_empty() {
            debug!("form rejected with {} field errors", errors.len());
            let shown = errors.clone();
            self.state.send_modify(|state| state.reject(shown));
            return SubmitOutcome::Invalid { errors };
        }
        self.state.send_modify(|state| state.reject(FieldErrors::default()));

        match records.request_submit(&mode, &fields).await {
            WriteOutcome::Applied => {
                info!("record saved");
                self.state.send_modify(FormState::close_after_save);
                SubmitOutcome::Saved
            }
            WriteOutcome::Failed(message) => SubmitOutcome::Rejected { message },
            WriteOutcome::Skipped => SubmitOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn open_create_always_starts_empty() {
        let mut state = FormState::default();
        state.open_edit(Record::new("1", "Rust", "3"));
        state.reject(validate(&RecordFields::default()));

        for _ in 0..3 {
            state.open_create();
            assert!(state.is_open);
            assert_eq!(state.mode, FormMode::Create);
            assert_eq!(state.fields, RecordFields::default());
            assert!(state.field_errors.is_empty());
        }
    }

    #[test]
    fn cancelled_edit_does_not_leak_into_next_record() {
        let a = Record::new("1", "Rust", "3");
        let b = Record::new("2", "Go", "2");
        let mut state = FormState::default();

        state.open_edit(a);
        state.update_field(Field::Title, "Rust 2024".to_string());
        state.cancel();
        assert!(!state.is_open);

        state.open_edit(b.clone());
        assert_eq!(state.fields, b.fields());
        assert_eq!(state.mode, FormMode::Edit(b));
    }

    #[test]
    fn open_edit_clears_previous_errors() {
        let mut state = FormState::default();
        state.open_create();
        state.reject(validate(&RecordFields::default()));
        assert_eq!(state.field_errors.get(Field::Title), Some(FieldError::Required("title")));

        state.open_edit(Record::new("1", "Rust", "3"));
        assert!(state.field_errors.is_empty());
    }

    #[test]
    fn update_field_does_not_validate() {
        let mut state = FormState::default();
        state.open_create();
        state.update_field(Field::Time, "-5".to_string());
        assert_eq!(state.fields.time, "-5");
        assert!(state.field_errors.is_empty());
    }

    #[test]
    fn closed_form_ignores_field_updates() {
        let form = FormController::new();
        let mut rx = form.subscribe();

        assert!(!form.update_field(Field::Title, "Rust"));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(form.state().fields, RecordFields::default());

        form.open_create();
        assert!(form.update_field(Field::Title, "Rust"));
        assert_eq!(rx.borrow_and_update().fields.title, "Rust");
    }

    #[test]
    fn controller_notifies_subscribers() {
        let form = FormController::new();
        let mut rx = form.subscribe();
        form.open_edit(Record::new("9", "SQL", "1"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().fields.title, "SQL");
    }
}
