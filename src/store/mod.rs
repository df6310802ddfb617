//! Persistence seams. The core only ever reads or writes whole values;
//! conflict resolution across devices is last-full-write-wins upstream.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ProjectRule, TimeLedger};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait RuleStore: Send + Sync {
    /// The full rule set, in user-defined order.
    async fn get_rules(&self) -> Result<Vec<ProjectRule>>;

    /// Replaces the full rule set.
    async fn set_rules(&self, rules: Vec<ProjectRule>) -> Result<()>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_ledger(&self) -> Result<TimeLedger>;

    async fn set_ledger(&self, ledger: TimeLedger) -> Result<()>;

    async fn get_switch_count(&self) -> Result<u64>;

    async fn set_switch_count(&self, count: u64) -> Result<()>;

    async fn get_paused(&self) -> Result<bool>;

    async fn set_paused(&self, paused: bool) -> Result<()>;
}
