//! Maps resolved projects to host tab groups on explicit request. Nothing
//! here runs automatically; grouping is always user-triggered.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::{
    host::{is_internal_url, BrowserHost, GroupId, TabInfo, WindowId},
    matching::resolve,
    models::ProjectRule,
    store::RuleStore,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Session-scoped (project name, window) → group map. Rebuilt from the
/// host's live groups on every organize pass and never persisted.
pub struct GroupingController {
    rules: Arc<dyn RuleStore>,
    host: Arc<dyn BrowserHost>,
    session_groups: Mutex<HashMap<(String, WindowId), GroupId>>,
}

impl GroupingController {
    pub fn new(rules: Arc<dyn RuleStore>, host: Arc<dyn BrowserHost>) -> Self {
        Self {
            rules,
            host,
            session_groups: Mutex::new(HashMap::new()),
        }
    }

    /// Groups every matchable tab under its project. Tabs without a URL, on
    /// internal pages, or matching no rule are left alone. Per-tab host
    /// failures are logged and skipped so one bad tab cannot abort the pass.
    pub async fn organize_all(&self, tabs: &[TabInfo]) -> Result<()> {
        self.rebuild_session_map().await?;

        let rules = self.rules.get_rules().await?;
        let mut grouped = 0usize;
        for tab in tabs {
            let url = tab.url.as_deref().unwrap_or("");
            if url.is_empty() || is_internal_url(url) {
                continue;
            }
            let title = tab.title.as_deref().unwrap_or("");
            let Some(rule) = resolve(url, title, &rules) else {
                continue;
            };
            match self.assign_to_group(tab, rule).await {
                Ok(()) => grouped += 1,
                Err(err) => {
                    log_warn!("failed to group tab {}: {err:#}", tab.id.0);
                }
            }
        }
        log_info!("organize pass grouped {grouped} of {} tabs", tabs.len());
        Ok(())
    }

    /// Ungroups every grouped tab and forgets the session map.
    pub async fn clear_all(&self, tabs: &[TabInfo]) -> Result<()> {
        for tab in tabs {
            if tab.group_id.is_none() {
                continue;
            }
            if let Err(err) = self.host.ungroup(tab.id).await {
                log_warn!("failed to ungroup tab {}: {err:#}", tab.id.0);
            }
        }
        self.session_groups.lock().await.clear();
        Ok(())
    }

    /// Drops all entries and reseeds from the groups the host reports right
    /// now, keyed by (title, window). Stale knowledge from previous passes is
    /// never trusted; existing groups are reused instead of duplicated.
    async fn rebuild_session_map(&self) -> Result<()> {
        let groups = self.host.query_groups().await?;
        let mut map = self.session_groups.lock().await;
        map.clear();
        for group in groups {
            map.insert((group.title, group.window_id), group.id);
        }
        Ok(())
    }

    async fn assign_to_group(&self, tab: &TabInfo, rule: &ProjectRule) -> Result<()> {
        let key = (rule.name.clone(), tab.window_id);

        let known = self.session_groups.lock().await.get(&key).copied();
        if let Some(group) = known {
            if self.host.group_exists(group).await.unwrap_or(false) {
                if tab.group_id == Some(group) {
                    return Ok(());
                }
                return self.host.add_to_group(group, tab.id).await;
            }
            // Deleted out from under us; invalidate just this entry.
            self.session_groups.lock().await.remove(&key);
        }

        let group = self
            .host
            .create_group(tab.window_id, tab.id, &rule.name, rule.color)
            .await?;
        self.session_groups.lock().await.insert(key, group);
        Ok(())
    }
}
