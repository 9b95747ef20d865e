//! Scroll restoration across in-app navigations within one browsing session.
//!
//! A [`ScrollRestorer`] keeps a bounded per-url history of scroll offsets in
//! session storage, records the current offset when a page unloads, and
//! replays it after the same url loads again.

pub mod managers;
pub mod page;
pub mod services;
pub mod storage;
pub mod types;

pub use managers::history_cache::{HistoryCache, HistoryCacheTrait};
pub use page::{MemoryPage, PageEnvironment, PageEvent};
pub use services::restore_controller::{RestoreOutcome, ScrollRestorer, ScrollRestorerTrait};
pub use services::scheduler::{ManualScheduler, TaskScheduler, TokioScheduler};
pub use types::options::RestoreOptions;
pub use types::record::{ScrollEntry, ScrollRecord};
