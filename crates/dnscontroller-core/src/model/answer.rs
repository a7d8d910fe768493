// ── Answer ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::detail::Detail;
use super::record_type::RecordType;
use crate::error::{CoreError, ValidationError};

/// A resolution target belonging to one record and one owner.
///
/// Natural key: `(target, type, record_id, owner_id)`. Details are only
/// loaded when `has_details` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "uuid", default)]
    pub id: Uuid,
    #[serde(default)]
    pub target: String,
    #[serde(rename = "type", default)]
    pub answer_type: String,
    #[serde(default)]
    pub ttl: u64,
    #[serde(default)]
    pub has_details: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Detail>,
    #[serde(default)]
    pub owner_id: Uuid,
    #[serde(default)]
    pub record_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Answer {
    pub fn new(target: &str, answer_type: &str, ttl: u64, owner_id: Uuid, record_id: Uuid) -> Self {
        Self {
            id: Uuid::nil(),
            target: target.to_owned(),
            answer_type: answer_type.to_owned(),
            ttl,
            has_details: false,
            details: Vec::new(),
            owner_id,
            record_id,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach SRV-style details and flag the answer accordingly.
    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.has_details = true;
        self.details.push(detail);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target.is_empty() {
            return Err(ValidationError::NoAnswerTarget);
        }

        if self.answer_type.is_empty() {
            return Err(ValidationError::NoAnswerType);
        }

        RecordType::check(&self.answer_type)?;

        Ok(())
    }

    /// Validation for answers arriving from a request: `has_details` and the
    /// details carried must agree, and an answer has at most one detail.
    pub(crate) fn validate_payload(&self) -> Result<(), ValidationError> {
        self.validate()?;

        match (self.has_details, self.details.len()) {
            (true, 0) => Err(ValidationError::NoAnswerDetail),
            (false, n) if n > 0 => Err(ValidationError::UnexpectedAnswerDetail),
            (_, n) if n > 1 => Err(ValidationError::MultipleAnswerDetails),
            _ => Ok(()),
        }
    }
}

/// Parse a JSON array of answers from a request body and validate each one.
pub fn parse_answers(body: &[u8]) -> Result<Vec<Answer>, CoreError> {
    let answers: Vec<Answer> = serde_json::from_slice(body)?;

    for answer in &answers {
        answer.validate_payload()?;
    }

    tracing::debug!(count = answers.len(), "parsed answers from body");

    Ok(answers)
}
