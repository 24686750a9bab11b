use serde::{Deserialize, Serialize};

use crate::models::Record;

/// A row as returned by `select=*`. Columns may be missing or typed
/// differently depending on how the table was created.
#[derive(Debug, Deserialize)]
pub struct RecordRow {
    pub id: Option<Scalar>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: Option<Scalar>,
}

/// A column value that may arrive as a JSON string or number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

impl TryFrom<RecordRow> for Record {
    type Error = String;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .map(Scalar::into_text)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "missing id".to_string())?;
        let title = row
            .title
            .ok_or_else(|| format!("row {} is missing title", id))?;
        let time = row
            .time
            .map(Scalar::into_text)
            .ok_or_else(|| format!("row {} is missing time", id))?;
        Ok(Record { id, title, time })
    }
}

#[derive(Debug, Serialize)]
pub struct WriteRecordRequest<'a> {
    pub title: &'a str,
    pub time: &'a str,
}
