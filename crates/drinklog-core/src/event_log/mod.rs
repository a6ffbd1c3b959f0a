//! In-memory log of drink entries with day-bucketed queries.
//!
//! The log is a plain value: it has no interior locking and is owned by a
//! single writer. Background persistence works on clones.

mod entry;

pub use entry::{Entry, EntryId};

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::day::{days_down_to, DayRange};
use crate::error::ValidationError;

/// Every entry the user has logged, keyed by id.
///
/// Serialized as a JSON array ordered by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct EventLog {
    entries: HashMap<EntryId, Entry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and insert a new entry, returning its id.
    pub fn add(&mut self, timestamp: DateTime<Utc>, amount: u32) -> Result<EntryId, ValidationError> {
        let entry = Entry::new(timestamp, amount)?;
        let id = entry.id();
        self.entries.insert(id, entry);
        Ok(id)
    }

    /// Insert a prebuilt entry. Fails if its id is already present.
    pub fn insert(&mut self, entry: Entry) -> Result<(), ValidationError> {
        if self.entries.contains_key(&entry.id()) {
            return Err(ValidationError::DuplicateId(entry.id().to_string()));
        }
        self.entries.insert(entry.id(), entry);
        Ok(())
    }

    /// Remove every entry whose id is in `ids`. Unknown ids are ignored.
    ///
    /// Returns how many entries were removed.
    pub fn delete(&mut self, ids: &HashSet<EntryId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| !ids.contains(id));
        before - self.entries.len()
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn earliest(&self) -> Option<DateTime<Utc>> {
        self.entries.values().map(Entry::timestamp).min()
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.entries.values().map(Entry::timestamp).max()
    }

    /// Entries logged on `day` in `tz`, newest first.
    pub fn entries_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Vec<&Entry> {
        let range = DayRange::for_day(day, tz);
        let mut found: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| range.contains(&e.timestamp()))
            .collect();
        found.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        found
    }

    /// Sum of amounts logged on `day` in `tz`; 0 for an empty day.
    pub fn total_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> u64 {
        let range = DayRange::for_day(day, tz);
        self.entries
            .values()
            .filter(|e| range.contains(&e.timestamp()))
            .map(|e| u64::from(e.amount()))
            .sum()
    }

    /// Per-day totals from `from` down to `to`, newest first.
    pub fn daily_totals<Tz: TimeZone>(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        tz: &Tz,
    ) -> Vec<(NaiveDate, u64)> {
        days_down_to(from, to)
            .into_iter()
            .map(|day| (day, self.total_on(day, tz)))
            .collect()
    }
}

impl TryFrom<Vec<Entry>> for EventLog {
    type Error = ValidationError;

    fn try_from(entries: Vec<Entry>) -> Result<Self, Self::Error> {
        let mut log = Self::new();
        for entry in entries {
            log.insert(entry)?;
        }
        Ok(log)
    }
}

impl From<EventLog> for Vec<Entry> {
    fn from(log: EventLog) -> Self {
        let mut entries: Vec<Entry> = log.entries.into_values().collect();
        entries.sort_by(|a, b| {
            a.timestamp()
                .cmp(&b.timestamp())
                .then_with(|| a.id().cmp(&b.id()))
        });
        entries
    }
}
