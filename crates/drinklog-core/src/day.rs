//! Calendar-day helpers.
//!
//! Entries are stored as UTC instants; every day-based query is resolved in a
//! caller-supplied time zone so that "today" means the user's local day.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// Range of `day` as observed in `tz`.
    ///
    /// The end is the next local midnight, so days spanning a DST switch are
    /// 23 or 25 hours long.
    pub fn for_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        let next = day.succ_opt().unwrap_or(NaiveDate::MAX);
        Self {
            start: start_of_day(day, tz),
            end: start_of_day(next, tz),
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// First valid local instant of `day`.
///
/// When local midnight falls into a DST gap, the earliest representable time
/// after it is used.
fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start.with_timezone(&Utc);
    }

    (1..=96)
        .map(|quarter| midnight + Duration::minutes(15 * quarter))
        .find_map(|candidate: NaiveDateTime| tz.from_local_datetime(&candidate).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight).with_timezone(&Utc))
}

/// Local calendar day containing `instant`.
pub fn day_of<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Current local day in `tz`.
pub fn today<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    day_of(&Utc::now(), tz)
}

/// The day `offset` days before `today`.
pub fn day_offset_from(today: NaiveDate, offset: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN)
}

/// Days from `from` down to `to`, both inclusive, newest first.
///
/// Returns an empty list when `to` is after `from`.
pub fn days_down_to(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = from;
    while day >= to {
        days.push(day);
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    days
}

/// Whether an entry stamped `timestamp` may be logged at `now`.
///
/// Anything before the end of the current local day is accepted, so a later
/// hour of today is fine but tomorrow is not. The log itself never checks this.
pub fn is_addable<Tz: TimeZone>(timestamp: &DateTime<Utc>, now: &DateTime<Utc>, tz: &Tz) -> bool {
    let today = DayRange::for_day(day_of(now, tz), tz);
    *timestamp < today.end
}
