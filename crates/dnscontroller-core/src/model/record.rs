// ── Record ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answer::Answer;
use super::record_type::RecordType;
use crate::error::ValidationError;

/// A named, typed DNS entry that owns zero or more [`Answer`]s.
///
/// Identity is the `(name, type)` pair after normalization (name lowercased,
/// type uppercased) plus the id assigned when the record is first stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "record")]
    pub name: String,
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<Answer>>,
    #[serde(rename = "uuid", default)]
    pub id: Uuid,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Build a record from untrusted route parameters.
    pub fn new(name: &str, record_type: &str) -> Result<Self, ValidationError> {
        let record = Self::unchecked(name.to_lowercase(), record_type.to_uppercase());
        record.validate()?;
        Ok(record)
    }

    /// Assemble a record without validating it; callers validate later.
    pub(crate) fn unchecked(name: String, record_type: String) -> Self {
        Self {
            name,
            record_type,
            answers: Some(Vec::new()),
            id: Uuid::nil(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Display path, `name/type`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.name, self.record_type)
    }

    pub fn answers(&self) -> &[Answer] {
        self.answers.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::NoRecordName);
        }

        if self.record_type.is_empty() {
            return Err(ValidationError::NoRecordType);
        }

        RecordType::check(&self.record_type)?;

        Ok(())
    }
}
