//! Capability contract between the core and the embedding browser host.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::ProjectColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub window_id: WindowId,
    pub url: Option<String>,
    pub title: Option<String>,
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: GroupId,
    pub window_id: WindowId,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

/// URL schemes owned by the browser itself. Tabs on these never resolve to a
/// project and are skipped by grouping.
const INTERNAL_SCHEMES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "edge://",
    "brave://",
    "vivaldi://",
    "devtools://",
    "about:",
];

pub fn is_internal_url(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    INTERNAL_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

/// Tab, window, and group primitives supplied by the embedding host.
///
/// Every method may fail at the host's discretion; callers treat a failure as
/// "operation did not happen" and carry on with unchanged state.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    async fn query_tabs(&self) -> Result<Vec<TabInfo>>;

    async fn get_tab(&self, id: TabId) -> Result<Option<TabInfo>>;

    /// The active tab of `window`, or of the last-focused window when `None`.
    async fn active_tab(&self, window: Option<WindowId>) -> Result<Option<TabInfo>>;

    async fn query_groups(&self) -> Result<Vec<GroupInfo>>;

    async fn group_exists(&self, id: GroupId) -> Result<bool>;

    /// Creates a group in `window` containing `tab`, labeled with `title`
    /// and `color`, and returns its id.
    async fn create_group(
        &self,
        window: WindowId,
        tab: TabId,
        title: &str,
        color: ProjectColor,
    ) -> Result<GroupId>;

    async fn add_to_group(&self, group: GroupId, tab: TabId) -> Result<()>;

    async fn ungroup(&self, tab: TabId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_urls_are_detected_case_insensitively() {
        assert!(is_internal_url("chrome://settings"));
        assert!(is_internal_url("CHROME://newtab"));
        assert!(is_internal_url("about:blank"));
        assert!(is_internal_url("devtools://devtools/bundled"));
        assert!(!is_internal_url("https://example.com/chrome://fake"));
        assert!(!is_internal_url("https://about.me"));
    }
}
