pub mod config;
pub mod day;
pub mod entry;
pub mod widget;

use std::error::Error;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use drinklog_core::{AppContext, Config, Entry};
use serde::Serialize;

pub type CmdResult<T = ()> = Result<T, Box<dyn Error>>;

/// Open the app context, run `f` against it, then flush and shut down.
///
/// The final flush runs even when `f` fails.
pub fn with_app<T>(f: impl FnOnce(&mut AppContext) -> CmdResult<T>) -> CmdResult<T> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let config = Config::load()?;
        let mut app = AppContext::open(config)?;
        let outcome = f(&mut app);
        let flushed = app.shutdown().await;
        let value = outcome?;
        flushed?;
        Ok::<T, Box<dyn Error>>(value)
    })
}

/// Accepts RFC 3339 (`2024-01-01T10:00:00Z`) or a local `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_timestamp(input: &str) -> CmdResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .map_err(|_| format!("invalid timestamp '{input}'"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| format!("timestamp '{input}' does not exist in the local time zone").into())
}

pub fn parse_date(input: &str) -> CmdResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{input}', expected YYYY-MM-DD").into())
}

#[derive(Serialize)]
pub struct EntryView {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub time: String,
    pub amount: u32,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id().to_string(),
            timestamp: entry.timestamp(),
            time: entry.timestamp().with_timezone(&Local).format("%H:%M").to_string(),
            amount: entry.amount(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
