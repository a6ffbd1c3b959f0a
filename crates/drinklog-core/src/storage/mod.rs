mod config;
mod saver;
mod store;

pub use config::{Config, CorruptPolicy, StorageConfig, WidgetConfig};
pub use saver::{SaveScheduler, SaveStatus};
pub use store::DurableStore;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Shared storage location for the app and the widget.
///
/// `DRINKLOG_HOME` overrides the location outright. Otherwise returns
/// `~/.config/drinklog[-dev]/` based on `DRINKLOG_ENV`.
///
/// # Errors
/// Returns [`CoreError::StorageUnavailable`] if the home directory cannot be
/// determined or the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("DRINKLOG_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| {
                    CoreError::StorageUnavailable("cannot determine home directory".into())
                })?
                .join(".config");

            let env = std::env::var("DRINKLOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("drinklog-dev")
            } else {
                base_dir.join("drinklog")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| {
        CoreError::StorageUnavailable(format!("cannot create {}: {e}", dir.display()))
    })?;
    Ok(dir)
}
