use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ProjectRule, TimeLedger};

use super::{LedgerStore, RuleStore};

#[derive(Debug, Default)]
struct MemoryInner {
    rules: Vec<ProjectRule>,
    ledger: TimeLedger,
    switch_count: u64,
    paused: bool,
}

/// In-process store for tests and for hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn get_rules(&self) -> Result<Vec<ProjectRule>> {
        Ok(self.inner.lock().unwrap().rules.clone())
    }

    async fn set_rules(&self, rules: Vec<ProjectRule>) -> Result<()> {
        self.inner.lock().unwrap().rules = rules;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_ledger(&self) -> Result<TimeLedger> {
        Ok(self.inner.lock().unwrap().ledger.clone())
    }

    async fn set_ledger(&self, ledger: TimeLedger) -> Result<()> {
        self.inner.lock().unwrap().ledger = ledger;
        Ok(())
    }

    async fn get_switch_count(&self) -> Result<u64> {
        Ok(self.inner.lock().unwrap().switch_count)
    }

    async fn set_switch_count(&self, count: u64) -> Result<()> {
        self.inner.lock().unwrap().switch_count = count;
        Ok(())
    }

    async fn get_paused(&self) -> Result<bool> {
        Ok(self.inner.lock().unwrap().paused)
    }

    async fn set_paused(&self, paused: bool) -> Result<()> {
        self.inner.lock().unwrap().paused = paused;
        Ok(())
    }
}
