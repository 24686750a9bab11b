use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted study entry. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub time: String,
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: time.into(),
        }
    }

    pub fn fields(&self) -> RecordFields {
        RecordFields {
            title: self.title.clone(),
            time: self.time.clone(),
        }
    }
}

/// Editable part of a record, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub title: String,
    pub time: String,
}

impl RecordFields {
    pub fn new(title: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time: time.into(),
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Time => self.time = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Time,
}
