//! Application context.
//!
//! One `AppContext` is created at startup and handed to the front end. It owns
//! the live log and the save worker; every mutation goes through it so a save
//! is always scheduled. `shutdown` performs the final flush.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::day::{self, is_addable};
use crate::deeplink::DayLink;
use crate::error::Result;
use crate::event_log::{Entry, EntryId, EventLog};
use crate::storage::{Config, DurableStore, SaveScheduler, SaveStatus};

pub struct AppContext<Tz: TimeZone = Local> {
    config: Config,
    store: DurableStore,
    log: EventLog,
    saver: SaveScheduler,
    selected: Option<NaiveDate>,
    tz: Tz,
}

impl AppContext<Local> {
    /// Open the configured backing file in the system's local time zone.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(config: Config) -> Result<Self> {
        let store = DurableStore::new(config.data_file()?);
        Self::open_with(config, store, Local)
    }
}

impl<Tz: TimeZone> AppContext<Tz> {
    /// Load the log from `store`, applying the configured corrupt-data policy,
    /// and start the save worker.
    pub fn open_with(config: Config, store: DurableStore, tz: Tz) -> Result<Self> {
        let log = store.load_with_policy(config.storage.on_corrupt)?;
        info!(
            path = %store.path().display(),
            entries = log.len(),
            "Opened entry log"
        );
        let saver = SaveScheduler::spawn(store.clone(), config.save_debounce());

        Ok(Self {
            config,
            store,
            log,
            saver,
            selected: None,
            tz,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    pub fn today(&self) -> NaiveDate {
        day::today(&self.tz)
    }

    /// Log a drink and schedule a save.
    pub fn add_entry(&mut self, timestamp: DateTime<Utc>, amount: u32) -> Result<EntryId> {
        let id = self.log.add(timestamp, amount)?;
        debug!(%id, %timestamp, amount, "Added entry");
        self.saver.schedule_save(&self.log);
        Ok(id)
    }

    /// Delete entries by id and schedule a save if anything changed.
    pub fn delete_entries(&mut self, ids: &HashSet<EntryId>) -> usize {
        let removed = self.log.delete(ids);
        debug!(requested = ids.len(), removed, "Deleted entries");
        if removed > 0 {
            self.saver.schedule_save(&self.log);
        }
        removed
    }

    pub fn entries_on(&self, day: NaiveDate) -> Vec<&Entry> {
        self.log.entries_on(day, &self.tz)
    }

    pub fn total_on(&self, day: NaiveDate) -> u64 {
        self.log.total_on(day, &self.tz)
    }

    /// Whether the front end should offer to log a drink at `timestamp`.
    pub fn can_add(&self, timestamp: &DateTime<Utc>) -> bool {
        is_addable(timestamp, &Utc::now(), &self.tz)
    }

    /// Resolve a `widget://stats/<N>` link and focus that day.
    pub fn handle_link(&mut self, input: &str) -> Result<NaiveDate> {
        let link = DayLink::parse(input)?;
        let day = link.resolve(self.today());
        debug!(offset = link.offset, %day, "Selected day from link");
        self.selected = Some(day);
        Ok(day)
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn status(&self) -> SaveStatus {
        self.saver.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.saver.subscribe()
    }

    /// Final flush and worker teardown.
    ///
    /// If the last background flush failed, the current log is written again.
    pub async fn shutdown(self) -> Result<()> {
        let retry = matches!(self.saver.status(), SaveStatus::Failed(_));
        let last = retry.then_some(self.log);
        self.saver.shutdown(last).await
    }
}
