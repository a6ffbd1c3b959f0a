//! Entry commands: log and delete drinks.

use std::collections::HashSet;

use chrono::Utc;
use clap::Subcommand;
use drinklog_core::EntryId;
use serde_json::json;

use super::{parse_timestamp, print_json, with_app, CmdResult, EntryView};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Log a drink
    Add {
        /// Number of glasses (1-10)
        #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=10))]
        amount: u32,
        /// When it was drunk (RFC 3339 or local YYYY-MM-DDTHH:MM), default now
        #[arg(long)]
        at: Option<String>,
    },
    /// Delete entries by id
    Delete {
        /// Entry ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub fn run(action: EntryAction) -> CmdResult {
    match action {
        EntryAction::Add { amount, at } => {
            let timestamp = match at {
                Some(raw) => parse_timestamp(&raw)?,
                None => Utc::now(),
            };

            with_app(|app| {
                if !app.can_add(&timestamp) {
                    return Err("can not add in the future".into());
                }
                let id = app.add_entry(timestamp, amount)?;
                let entry = app.log().get(&id).ok_or("entry vanished after insert")?;
                print_json(&EntryView::from(entry))
            })
        }
        EntryAction::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|raw| {
                    raw.parse::<EntryId>()
                        .map_err(|e| format!("invalid entry id '{raw}': {e}"))
                })
                .collect::<Result<HashSet<_>, _>>()?;

            with_app(|app| {
                let removed = app.delete_entries(&ids);
                print_json(&json!({ "requested": ids.len(), "removed": removed }))
            })
        }
    }
}
