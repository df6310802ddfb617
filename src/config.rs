use std::{fs, path::PathBuf, sync::RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_RETENTION_DAYS;

/// Tunable thresholds for the tracking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Period of the safety-net flush ticker.
    pub flush_interval_secs: u64,

    /// Ledger retention horizon in days.
    pub retention_days: i64,

    /// Checkpoints at or below this many seconds are dropped as noise.
    pub min_flush_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: 30,
            retention_days: DEFAULT_RETENTION_DAYS,
            min_flush_secs: 1.0,
        }
    }
}

/// JSON-file-backed config, tolerant of a missing or unreadable file.
pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<EngineConfig>,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            EngineConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> EngineConfig {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, config: EngineConfig) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = config;
        self.persist(&guard)
    }

    fn persist(&self, data: &EngineConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write config to {}", self.path.display()))
    }
}
