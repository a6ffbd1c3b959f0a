//! Read-only summary for the home-screen widget.
//!
//! The widget runs in its own process and loads the backing file itself; it
//! never coordinates with the app's save worker, so a slightly stale view is
//! expected.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::day::day_offset_from;
use crate::deeplink::DayLink;
use crate::event_log::EventLog;

/// Total for one of the most recent days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStat {
    /// Days before today; 0 is today.
    pub offset: u32,
    pub day: NaiveDate,
    pub total: u64,
    pub label: String,
    /// Link that opens the app on this day.
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSummary {
    /// Timestamp of the most recent drink, if any.
    pub last_entry: Option<DateTime<Utc>>,
    /// Index 0 is today, then yesterday, and so on.
    pub stats: Vec<DayStat>,
}

impl WidgetSummary {
    pub fn build<Tz: TimeZone>(log: &EventLog, today: NaiveDate, days: u32, tz: &Tz) -> Self {
        let stats = (0..days)
            .map(|offset| {
                let day = day_offset_from(today, offset);
                DayStat {
                    offset,
                    day,
                    total: log.total_on(day, tz),
                    label: relative_day_label(offset),
                    link: DayLink::new(offset).to_url(),
                }
            })
            .collect();

        Self {
            last_entry: log.latest(),
            stats,
        }
    }
}

/// "1 glass", "3 glasses".
pub fn glass_count(amount: u64) -> String {
    if amount == 1 {
        "1 glass".to_string()
    } else {
        format!("{amount} glasses")
    }
}

pub fn relative_day_label(offset: u32) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n => format!("{n} days ago"),
    }
}
