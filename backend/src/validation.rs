//! Field validators for the add/edit form.
//!
//! Both validators always run, so a submission can carry errors for every
//! field at once. Nothing here touches a store.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::models::{Field, RecordFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("time must be a number")]
    NotANumber,

    #[error("time must be 0 or greater")]
    Minimum,
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Field name to validation message. Empty when the form is valid or untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }
}

pub fn validate_title(title: &str) -> Option<FieldError> {
    if title.trim().is_empty() {
        return Some(FieldError::Required("title"));
    }
    None
}

/// `time` is kept as text but must parse as a finite, non-negative number.
pub fn validate_time(time: &str) -> Option<FieldError> {
    let time = time.trim();
    if time.is_empty() {
        return Some(FieldError::Required("time"));
    }
    match time.parse::<f64>() {
        Ok(value) if !value.is_finite() => Some(FieldError::NotANumber),
        Ok(value) if value < 0.0 => Some(FieldError::Minimum),
        Ok(_) => None,
        Err(_) => Some(FieldError::NotANumber),
    }
}

pub fn validate(fields: &RecordFields) -> FieldErrors {
    let mut errors = BTreeMap::new();
    if let Some(err) = validate_title(&fields.title) {
        errors.insert(Field::Title, err);
    }
    if let Some(err) = validate_time(&fields.time) {
        errors.insert(Field::Time, err);
    }
    FieldErrors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_reports_both_required_errors() {
        let errors = validate(&RecordFields::default());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Title), Some(FieldError::Required("title")));
        assert_eq!(errors.get(Field::Time), Some(FieldError::Required("time")));
    }

    #[test]
    fn whitespace_title_is_required() {
        assert_eq!(validate_title("   \t"), Some(FieldError::Required("title")));
        assert_eq!(validate_title(" Rust "), None);
    }

    #[test]
    fn negative_time_hits_minimum() {
        let errors = validate(&RecordFields::new("Rust", "-1"));
        assert_eq!(errors.get(Field::Title), None);
        assert_eq!(errors.get(Field::Time), Some(FieldError::Minimum));
    }

    #[test]
    fn zero_and_fractional_times_are_accepted() {
        assert_eq!(validate_time("0"), None);
        assert_eq!(validate_time("-0"), None);
        assert_eq!(validate_time("1.5"), None);
        assert_eq!(validate_time("100000"), None);
    }

    #[test]
    fn unparseable_time_is_rejected() {
        assert_eq!(validate_time("two"), Some(FieldError::NotANumber));
        assert_eq!(validate_time("NaN"), Some(FieldError::NotANumber));
        assert_eq!(validate_time("inf"), Some(FieldError::NotANumber));
    }

    #[test]
    fn errors_serialize_as_messages_keyed_by_field() {
        let errors = validate(&RecordFields::new("", "-3"));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "title is required",
                "time": "time must be 0 or greater",
            })
        );
    }
}
