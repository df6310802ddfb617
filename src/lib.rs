//! Matches browser tabs to user-defined project rules and accounts time spent
//! per project per day.
//!
//! The embedding host implements [`host::BrowserHost`] plus the store traits
//! in [`store`], builds an [`engine::Engine`], and forwards browser events as
//! [`engine::HostEvent`] values. Everything else (wildcard matching, the
//! three-pass resolver, flush checkpointing, tab grouping) lives here.

pub mod config;
pub mod engine;
pub mod grouping;
pub mod host;
pub mod matching;
pub mod models;
pub mod store;
pub mod tracking;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::EngineConfig;
pub use engine::{Engine, HostEvent};
pub use host::{BrowserHost, GroupId, GroupInfo, IdleState, TabId, TabInfo, WindowId};
pub use models::{ProjectColor, ProjectRule, TimeLedger};
pub use store::{LedgerStore, MemoryStore, RuleStore, SqliteStore};
