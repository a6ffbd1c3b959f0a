use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque, immutable identifier of a logged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Shape of an entry on disk, checked before it becomes an [`Entry`].
#[derive(Deserialize)]
struct RawEntry {
    id: EntryId,
    timestamp: DateTime<Utc>,
    amount: u32,
}

/// One logged drink.
///
/// Fields are private so an entry with `amount == 0` can't be built, either
/// in code or by deserializing a hand-edited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    id: EntryId,
    timestamp: DateTime<Utc>,
    amount: u32,
}

impl Entry {
    /// Build an entry with a freshly generated id.
    pub fn new(timestamp: DateTime<Utc>, amount: u32) -> Result<Self, ValidationError> {
        Self::with_id(EntryId::new(), timestamp, amount)
    }

    /// Build an entry with a known id.
    pub fn with_id(
        id: EntryId,
        timestamp: DateTime<Utc>,
        amount: u32,
    ) -> Result<Self, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::InvalidAmount(amount));
        }
        Ok(Self {
            id,
            timestamp,
            amount,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }
}

impl TryFrom<RawEntry> for Entry {
    type Error = ValidationError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Self::with_id(raw.id, raw.timestamp, raw.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_rejected() {
        let err = Entry::new(Utc::now(), 0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmount(0));
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let now = Utc::now();
        let a = Entry::new(now, 1).unwrap();
        let b = Entry::new(now, 1).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_entry_id_parses_display_form() {
        let id = EntryId::new();
        let parsed: EntryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero_amount() {
        let json = r#"{
            "id": "6f1c1f3e-8e0b-4c43-9a57-3b8f5d0f2a10",
            "timestamp": "2024-01-01T10:00:00Z",
            "amount": 0
        }"#;
        let result: Result<Entry, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = Entry::new(Utc::now(), 2).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("id").is_some());
        assert!(value.get("timestamp").is_some());
        assert_eq!(value["amount"], 2);
    }
}
