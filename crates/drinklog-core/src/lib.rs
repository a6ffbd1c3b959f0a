//! # DrinkLog Core Library
//!
//! This library provides the core logic for DrinkLog, a single-user tracker
//! of glasses drunk per day. The CLI binary and the read-only widget summary
//! are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Event log**: an in-memory set of timestamped, quantified entries with
//!   day-bucketed queries in the caller's time zone
//! - **Storage**: whole-document JSON persistence with atomic replace, a
//!   debounced background save worker, and TOML configuration
//! - **App context**: the single owner of the live log, created at startup
//!   and torn down with a final flush
//!
//! ## Key Components
//!
//! - [`EventLog`]: entries and per-day queries
//! - [`DurableStore`]: load/flush of the backing file
//! - [`SaveScheduler`]: trailing-edge debounced saves with observable status
//! - [`AppContext`]: explicit application state passed to the front end
//! - [`DayLink`]: parser for inbound `widget://stats/<N>` links

pub mod app;
pub mod day;
pub mod deeplink;
pub mod error;
pub mod event_log;
pub mod storage;
pub mod widget;

pub use app::AppContext;
pub use day::DayRange;
pub use deeplink::DayLink;
pub use error::{ConfigError, CoreError, DeepLinkError, ValidationError};
pub use event_log::{Entry, EntryId, EventLog};
pub use storage::{Config, CorruptPolicy, DurableStore, SaveScheduler, SaveStatus};
pub use widget::{DayStat, WidgetSummary};
