//! Read-only widget summary.
//!
//! Runs like the home-screen widget: loads the backing file on its own and
//! never writes to it.

use chrono::Local;
use drinklog_core::day::today;
use drinklog_core::{Config, DurableStore, WidgetSummary};
use tracing::debug;

use super::{print_json, CmdResult};

pub fn run(days: Option<u32>) -> CmdResult {
    let config = Config::load()?;
    let store = DurableStore::new(config.data_file()?);
    let log = store.load()?;

    let days = days.unwrap_or(config.widget.days);
    let summary = WidgetSummary::build(&log, today(&Local), days, &Local);
    debug!(entries = log.len(), days, "Built widget summary");
    print_json(&summary)
}
