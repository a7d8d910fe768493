// ── Answer detail ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// SRV-style extension of an [`Answer`](super::Answer), 1:1 with it.
///
/// Both identifiers must be set before any persistence operation, so the
/// detail's own id is generated when the value is built rather than by the
/// store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(rename = "uuid", default)]
    pub id: Uuid,
    #[serde(default)]
    pub answer_id: Uuid,
    #[serde(default)]
    pub port: i64,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Detail {
    /// Build a detail for `answer_id` with a freshly generated id.
    pub fn new(answer_id: Uuid, port: i64, priority: i64, weight: i64, protocol: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            answer_id,
            port,
            priority,
            protocol: protocol.to_owned(),
            weight,
            created_at: None,
            updated_at: None,
        }
    }

    /// Bind a detail parsed from a request to its owning answer.
    ///
    /// Assigns an id if the payload did not carry one.
    pub fn attach_to(&mut self, answer_id: Uuid) {
        if self.id.is_nil() {
            self.id = Uuid::new_v4();
        }
        self.answer_id = answer_id;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NoDetailId);
        }

        if self.answer_id.is_nil() {
            return Err(ValidationError::NoDetailAnswerId);
        }

        Ok(())
    }
}
