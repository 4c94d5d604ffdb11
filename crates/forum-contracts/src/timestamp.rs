use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::SchemaViolation;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// An ISO-8601 timestamp as received on the wire.
///
/// Timestamps without an offset carry no timezone information and are kept apart from
/// zoned ones: the two are never compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Floating(NaiveDateTime),
}

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Timestamp::Zoned(dt));
        }
        // RFC 3339 requires seconds; tolerate a space separator as SQLite emits it.
        if let Some((date, time)) = raw.split_once(' ') {
            if let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{date}T{time}")) {
                return Some(Timestamp::Zoned(dt));
            }
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(Timestamp::Floating)
    }

    pub fn has_offset(&self) -> bool {
        matches!(self, Timestamp::Zoned(_))
    }

    /// Orders two timestamps when both are zoned or both are floating.
    pub fn compare(&self, other: &Timestamp) -> Option<Ordering> {
        match (self, other) {
            (Timestamp::Zoned(a), Timestamp::Zoned(b)) => Some(a.cmp(b)),
            (Timestamp::Floating(a), Timestamp::Floating(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Checks that `raw` is an ISO-8601 timestamp; `field` names it in the violation.
pub fn require_timestamp(field: &str, raw: &str) -> Result<Timestamp, SchemaViolation> {
    Timestamp::parse(raw).ok_or_else(|| {
        SchemaViolation::at(field, "ISO-8601 timestamp", format!("string \"{raw}\""))
    })
}

/// Checks both timestamps and that `updated_at` does not precede `created_at`.
pub fn require_ordered(created_at: &str, updated_at: &str) -> Result<(), SchemaViolation> {
    let created = require_timestamp("created_at", created_at)?;
    let updated = require_timestamp("updated_at", updated_at)?;
    if created.compare(&updated) == Some(Ordering::Greater) {
        return Err(SchemaViolation::at(
            "updated_at",
            format!("timestamp at or after created_at ({created_at})"),
            format!("string \"{updated_at}\""),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zoned_and_floating_forms() {
        assert!(Timestamp::parse("2024-01-01T00:00:00Z").unwrap().has_offset());
        assert!(Timestamp::parse("2024-01-01T00:00:00.123+02:00")
            .unwrap()
            .has_offset());
        assert!(!Timestamp::parse("2024-01-01 12:30:00").unwrap().has_offset());
        assert!(!Timestamp::parse("2024-01-01T12:30").unwrap().has_offset());
        assert!(Timestamp::parse("2024-01-01 12:30:00Z").unwrap().has_offset());
    }

    #[test]
    fn rejects_non_timestamps() {
        assert!(Timestamp::parse("yesterday").is_none());
        assert!(Timestamp::parse("2024-13-01T00:00:00Z").is_none());
        let err = require_timestamp("created_at", "").unwrap_err();
        assert_eq!(err.field(), Some("created_at"));
    }

    #[test]
    fn zoned_comparison_uses_instants() {
        let a = Timestamp::parse("2024-01-01T02:00:00+02:00").unwrap();
        let b = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(a.compare(&b), Some(Ordering::Equal));
    }

    #[test]
    fn mixed_forms_are_not_compared() {
        let zoned = Timestamp::parse("2024-01-02T00:00:00Z").unwrap();
        let floating = Timestamp::parse("2024-01-01 00:00:00").unwrap();
        assert_eq!(zoned.compare(&floating), None);
        assert!(require_ordered("2024-01-02T00:00:00Z", "2024-01-01 00:00:00").is_ok());
    }

    #[test]
    fn updated_before_created_is_rejected() {
        let err = require_ordered("2024-02-01T00:00:00Z", "2024-01-01T00:00:00Z").unwrap_err();
        assert_eq!(err.field(), Some("updated_at"));
        assert!(require_ordered("2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z").is_ok());
    }
}
