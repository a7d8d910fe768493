// ── API-to-persisted conversions ──
//
// `to_persisted` re-validates, normalizes the identifying fields and only
// carries an id across when one has been assigned. `from_persisted` parses
// every stored id (a malformed one fails the whole conversion) and finishes
// by validating the result, so a corrupt row surfaces at read time.
//
// Loading child rows (answers of a record, details of an answer) needs the
// store and lives in `ops`.

use uuid::Uuid;

use crate::error::{CoreError, StoreError, ValidationError};
use crate::model::{Answer, Detail, Record};
use crate::store::{AnswerKey, AnswerRow, DetailRow, RecordRow};

// ── Helpers ────────────────────────────────────────────────────────

/// `None` for the nil id, so the store knows to assign one.
fn persisted_id(id: Uuid) -> Option<String> {
    (!id.is_nil()).then(|| id.to_string())
}

fn parse_id(field: &str, raw: Option<&str>) -> Result<Uuid, StoreError> {
    let raw = raw.ok_or_else(|| StoreError::InvalidData(format!("{field} is missing")))?;
    Uuid::parse_str(raw).map_err(|e| StoreError::InvalidData(format!("malformed {field} {raw:?}: {e}")))
}

// ── Record ─────────────────────────────────────────────────────────

impl Record {
    pub fn to_persisted(&self) -> Result<RecordRow, ValidationError> {
        self.validate()?;

        let row = RecordRow {
            id: persisted_id(self.id),
            record: self.name.to_lowercase(),
            record_type: self.record_type.to_uppercase(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        Ok(row)
    }

    /// Hydrate the record's own fields. Answers are left empty.
    pub fn from_persisted(row: RecordRow) -> Result<Self, CoreError> {
        let mut record = Self::unchecked(row.record, row.record_type);
        record.id = parse_id("record id", row.id.as_deref())?;
        record.created_at = row.created_at;
        record.updated_at = row.updated_at;

        record.validate()?;
        Ok(record)
    }
}

// ── Answer ─────────────────────────────────────────────────────────

impl Answer {
    pub fn to_persisted(&self) -> Result<AnswerRow, ValidationError> {
        self.validate()?;

        Ok(AnswerRow {
            id: persisted_id(self.id),
            target: self.target.to_lowercase(),
            answer_type: self.answer_type.to_uppercase(),
            ttl: i64::try_from(self.ttl).unwrap_or(i64::MAX),
            has_details: self.has_details,
            owner_id: self.owner_id.to_string(),
            record_id: self.record_id.to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Hydrate the answer's own fields. Details are left empty.
    pub fn from_persisted(row: AnswerRow) -> Result<Self, CoreError> {
        let ttl = u64::try_from(row.ttl)
            .map_err(|_| StoreError::InvalidData(format!("negative answer ttl {}", row.ttl)))?;

        let answer = Self {
            id: parse_id("answer id", row.id.as_deref())?,
            target: row.target,
            answer_type: row.answer_type,
            ttl,
            has_details: row.has_details,
            details: Vec::new(),
            owner_id: parse_id("answer owner_id", Some(&row.owner_id))?,
            record_id: parse_id("answer record_id", Some(&row.record_id))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        answer.validate()?;
        Ok(answer)
    }

    /// The normalized natural key used for lookups.
    pub fn key(&self) -> AnswerKey {
        AnswerKey {
            target: self.target.to_lowercase(),
            answer_type: self.answer_type.to_uppercase(),
            record_id: self.record_id.to_string(),
            owner_id: self.owner_id.to_string(),
        }
    }
}

// ── Detail ─────────────────────────────────────────────────────────

impl Detail {
    pub fn to_persisted(&self) -> Result<DetailRow, ValidationError> {
        self.validate()?;

        Ok(DetailRow {
            id: persisted_id(self.id),
            answer_id: self.answer_id.to_string(),
            port: Some(self.port),
            priority: Some(self.priority),
            weight: Some(self.weight),
            protocol: Some(self.protocol.clone()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    pub fn from_persisted(row: DetailRow) -> Result<Self, CoreError> {
        let detail = Self {
            id: parse_id("detail id", row.id.as_deref())?,
            answer_id: parse_id("detail answer_id", Some(&row.answer_id))?,
            port: row.port.unwrap_or_default(),
            priority: row.priority.unwrap_or_default(),
            protocol: row.protocol.unwrap_or_default(),
            weight: row.weight.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        detail.validate()?;
        Ok(detail)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    const HAPPY: &str = "52087acc-b0e9-4060-bc48-f37182b6becc";

    fn happy_id() -> Uuid {
        Uuid::parse_str(HAPPY).unwrap()
    }

    // ── Record ──

    #[test]
    fn record_to_persisted_happy_path() {
        let mut record = Record::new("example.com", "A").unwrap();
        record.id = happy_id();

        let row = record.to_persisted().unwrap();

        assert_eq!(
            row,
            RecordRow {
                id: Some(HAPPY.into()),
                record: "example.com".into(),
                record_type: "A".into(),
                created_at: None,
                updated_at: None,
            }
        );
    }

    #[test]
    fn record_to_persisted_leaves_new_ids_unassigned() {
        let record = Record::new("example.com", "SRV").unwrap();
        assert_eq!(record.to_persisted().unwrap().id, None);
    }

    #[test]
    fn record_to_persisted_rejects_invalid() {
        let mut no_name = Record::new("example.com", "A").unwrap();
        no_name.name.clear();
        assert_eq!(no_name.to_persisted(), Err(ValidationError::NoRecordName));

        let mut no_type = Record::new("example.com", "A").unwrap();
        no_type.record_type.clear();
        assert_eq!(no_type.to_persisted(), Err(ValidationError::NoRecordType));
    }

    #[test]
    fn record_round_trip() {
        for (name, rtype) in [("Example.com", "a"), ("_sip._udp.example.com", "srv")] {
            let mut record = Record::new(name, rtype).unwrap();
            record.id = Uuid::new_v4();

            let back = Record::from_persisted(record.to_persisted().unwrap()).unwrap();

            assert_eq!(back, record);
            assert_eq!(back.name, name.to_lowercase());
            assert_eq!(back.record_type, rtype.to_uppercase());
        }
    }

    #[test]
    fn record_from_persisted_rejects_malformed_id() {
        let row = RecordRow {
            id: Some("not-a-uuid".into()),
            record: "example.com".into(),
            record_type: "A".into(),
            created_at: None,
            updated_at: None,
        };
        let err = Record::from_persisted(row).unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::InvalidData(_))));
    }

    #[test]
    fn record_from_persisted_rejects_corrupt_type() {
        let row = RecordRow {
            id: Some(HAPPY.into()),
            record: "example.com".into(),
            record_type: "MX".into(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        assert_eq!(
            Record::from_persisted(row).unwrap_err(),
            CoreError::Validation(ValidationError::UnsupportedType("MX".into()))
        );
    }

    // ── Answer ──

    #[test]
    fn answer_to_persisted_normalizes() {
        let mut answer = Answer::new("example.COM", "SrV", 10, happy_id(), happy_id());
        answer.id = happy_id();

        let row = answer.to_persisted().unwrap();

        assert_eq!(
            row,
            AnswerRow {
                id: Some(HAPPY.into()),
                target: "example.com".into(),
                answer_type: "SRV".into(),
                ttl: 10,
                has_details: false,
                owner_id: HAPPY.into(),
                record_id: HAPPY.into(),
                created_at: None,
                updated_at: None,
            }
        );
    }

    #[test]
    fn answer_from_persisted_rejects_malformed_owner() {
        let mut row = Answer::new("1.1.2.1", "A", 60, happy_id(), happy_id())
            .to_persisted()
            .unwrap();
        row.id = Some(HAPPY.into());
        row.owner_id = "owner".into();

        assert!(matches!(
            Answer::from_persisted(row),
            Err(CoreError::Store(StoreError::InvalidData(_)))
        ));
    }

    #[test]
    fn answer_from_persisted_rejects_negative_ttl() {
        let mut row = Answer::new("1.1.2.1", "A", 60, happy_id(), happy_id())
            .to_persisted()
            .unwrap();
        row.id = Some(HAPPY.into());
        row.ttl = -1;

        assert_eq!(
            Answer::from_persisted(row),
            Err(CoreError::Store(StoreError::InvalidData(
                "negative answer ttl -1".into()
            )))
        );
    }

    #[test]
    fn answer_key_is_normalized() {
        let answer = Answer::new("Host.Example.com", "a", 60, happy_id(), happy_id());
        let key = answer.key();
        assert_eq!(key.target, "host.example.com");
        assert_eq!(key.answer_type, "A");
    }

    // ── Detail ──

    #[test]
    fn detail_to_persisted_happy_path() {
        let detail = Detail {
            id: happy_id(),
            answer_id: happy_id(),
            port: 1337,
            priority: 10,
            protocol: "tcp".into(),
            weight: 10,
            created_at: None,
            updated_at: None,
        };

        assert_eq!(
            detail.to_persisted().unwrap(),
            DetailRow {
                id: Some(HAPPY.into()),
                answer_id: HAPPY.into(),
                port: Some(1337),
                priority: Some(10),
                weight: Some(10),
                protocol: Some("tcp".into()),
                created_at: None,
                updated_at: None,
            }
        );
    }

    #[test]
    fn detail_to_persisted_requires_answer_id() {
        let mut detail = Detail::new(happy_id(), 1337, 10, 10, "tcp");
        detail.answer_id = Uuid::nil();
        assert_eq!(detail.to_persisted(), Err(ValidationError::NoDetailAnswerId));
    }

    #[test]
    fn detail_to_persisted_requires_own_id() {
        let mut detail = Detail::new(happy_id(), 1337, 10, 10, "tcp");
        detail.id = Uuid::nil();
        assert_eq!(detail.to_persisted(), Err(ValidationError::NoDetailId));
    }

    #[test]
    fn detail_from_persisted_fills_null_columns() {
        let row = DetailRow {
            id: Some(Uuid::new_v4().to_string()),
            answer_id: HAPPY.into(),
            port: None,
            priority: Some(5),
            weight: None,
            protocol: None,
            created_at: None,
            updated_at: None,
        };

        let detail = Detail::from_persisted(row).unwrap();
        assert_eq!(detail.port, 0);
        assert_eq!(detail.priority, 5);
        assert_eq!(detail.protocol, "");
        assert_eq!(detail.answer_id, happy_id());
    }
}
