// ── Supported record types ──
//
// The one registry of record types accepted anywhere in the entity layer.
// Both record and answer validation go through `RecordType::check`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::ValidationError;

/// A record type this controller knows how to store.
///
/// Matching is case-sensitive against the uppercased form; callers hand in
/// whatever they received and [`RecordType::check`] normalizes first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum RecordType {
    A,
    #[serde(rename = "SRV")]
    #[strum(serialize = "SRV")]
    Srv,
}

impl RecordType {
    /// Uppercase `raw` and look it up in the registry.
    ///
    /// An empty string is reported as unsupported; entity validation checks
    /// for emptiness first so it can return the more specific kind.
    pub fn check(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.to_uppercase();
        normalized
            .parse()
            .map_err(|_| ValidationError::UnsupportedType(normalized))
    }

    /// Every supported type, in registry order.
    pub fn supported() -> Vec<Self> {
        Self::iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_any_case() {
        assert_eq!(RecordType::check("a").unwrap(), RecordType::A);
        assert_eq!(RecordType::check("SrV").unwrap(), RecordType::Srv);
        assert_eq!(RecordType::check("SRV").unwrap(), RecordType::Srv);
    }

    #[test]
    fn check_rejects_types_outside_the_registry() {
        for raw in ["TEAPOT", "MX", "aaaa", "cname", ""] {
            assert!(
                matches!(
                    RecordType::check(raw),
                    Err(ValidationError::UnsupportedType(_))
                ),
                "{raw:?} should be unsupported"
            );
        }
    }

    #[test]
    fn display_is_the_normalized_form() {
        assert_eq!(RecordType::A.to_string(), "A");
        assert_eq!(RecordType::Srv.as_ref(), "SRV");
    }

    #[test]
    fn registry_has_exactly_two_members() {
        assert_eq!(RecordType::supported(), vec![RecordType::A, RecordType::Srv]);
    }
}
