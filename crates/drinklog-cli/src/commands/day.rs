//! Day views: one day's entries, the day grid, and widget links.

use chrono::NaiveDate;
use clap::Subcommand;
use drinklog_core::day::{day_of, day_offset_from, days_down_to};
use drinklog_core::widget::glass_count;
use drinklog_core::AppContext;
use serde::Serialize;

use super::{parse_date, print_json, with_app, CmdResult, EntryView};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show one day's entries
    Show {
        /// Days before today (0 = today)
        #[arg(long, conflicts_with = "date")]
        offset: Option<u32>,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Totals for every day from today back to the first entry
    List,
    /// Open the day a widget link points at (e.g. widget://stats/1)
    Open {
        url: String,
    },
}

#[derive(Serialize)]
struct DayView {
    day: NaiveDate,
    total: u64,
    label: String,
    entries: Vec<EntryView>,
}

#[derive(Serialize)]
struct DayCell {
    day: NaiveDate,
    total: u64,
    label: String,
}

fn day_view(app: &AppContext, day: NaiveDate) -> DayView {
    let total = app.total_on(day);
    DayView {
        day,
        total,
        label: glass_count(total),
        entries: app.entries_on(day).into_iter().map(EntryView::from).collect(),
    }
}

pub fn run(action: DayAction) -> CmdResult {
    match action {
        DayAction::Show { offset, date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            with_app(|app| {
                let day = match (date, offset) {
                    (Some(date), _) => date,
                    (None, Some(offset)) => day_offset_from(app.today(), offset),
                    (None, None) => app.today(),
                };
                print_json(&day_view(app, day))
            })
        }
        DayAction::List => with_app(|app| {
            let today = app.today();
            let first = app
                .log()
                .earliest()
                .map(|ts| day_of(&ts, app.time_zone()))
                .unwrap_or(today);
            let cells: Vec<DayCell> = days_down_to(today, first)
                .into_iter()
                .map(|day| {
                    let total = app.total_on(day);
                    DayCell {
                        day,
                        total,
                        label: glass_count(total),
                    }
                })
                .collect();
            print_json(&cells)
        }),
        DayAction::Open { url } => with_app(|app| {
            let day = app.handle_link(&url)?;
            print_json(&day_view(app, day))
        }),
    }
}
