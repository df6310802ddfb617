//! Scripted in-memory browser host for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::host::{BrowserHost, GroupId, GroupInfo, TabId, TabInfo, WindowId};
use crate::models::ProjectColor;

#[derive(Default)]
struct FakeHostInner {
    tabs: Vec<TabInfo>,
    groups: Vec<GroupInfo>,
    active: HashMap<WindowId, TabId>,
    focused_window: Option<WindowId>,
    next_group_id: i64,
    groups_created: usize,
}

pub(crate) struct FakeHost {
    inner: Mutex<FakeHostInner>,
}

impl FakeHost {
    pub fn new(tabs: Vec<TabInfo>) -> Self {
        Self {
            inner: Mutex::new(FakeHostInner {
                tabs,
                next_group_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn set_active_tab(&self, window: WindowId, tab: TabId) {
        let mut inner = self.inner.lock().unwrap();
        inner.active.insert(window, tab);
        inner.focused_window = Some(window);
    }

    /// Simulates the user deleting a group out from under the core.
    pub fn delete_group(&self, id: GroupId) {
        let mut inner = self.inner.lock().unwrap();
        inner.groups.retain(|group| group.id != id);
        for tab in &mut inner.tabs {
            if tab.group_id == Some(id) {
                tab.group_id = None;
            }
        }
    }

    pub fn groups(&self) -> Vec<GroupInfo> {
        self.inner.lock().unwrap().groups.clone()
    }

    pub fn groups_created(&self) -> usize {
        self.inner.lock().unwrap().groups_created
    }

    pub fn tab(&self, id: TabId) -> Option<TabInfo> {
        self.inner
            .lock()
            .unwrap()
            .tabs
            .iter()
            .find(|tab| tab.id == id)
            .cloned()
    }
}

#[async_trait]
impl BrowserHost for FakeHost {
    async fn query_tabs(&self) -> Result<Vec<TabInfo>> {
        Ok(self.inner.lock().unwrap().tabs.clone())
    }

    async fn get_tab(&self, id: TabId) -> Result<Option<TabInfo>> {
        Ok(self.tab(id))
    }

    async fn active_tab(&self, window: Option<WindowId>) -> Result<Option<TabInfo>> {
        let inner = self.inner.lock().unwrap();
        let window = window.or(inner.focused_window);
        let Some(window) = window else {
            return Ok(None);
        };
        let Some(tab_id) = inner.active.get(&window) else {
            return Ok(None);
        };
        Ok(inner.tabs.iter().find(|tab| tab.id == *tab_id).cloned())
    }

    async fn query_groups(&self) -> Result<Vec<GroupInfo>> {
        Ok(self.inner.lock().unwrap().groups.clone())
    }

    async fn group_exists(&self, id: GroupId) -> Result<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .groups
            .iter()
            .any(|group| group.id == id))
    }

    async fn create_group(
        &self,
        window: WindowId,
        tab: TabId,
        title: &str,
        _color: ProjectColor,
    ) -> Result<GroupId> {
        let mut inner = self.inner.lock().unwrap();
        let id = GroupId(inner.next_group_id);
        inner.next_group_id += 1;
        inner.groups_created += 1;
        inner.groups.push(GroupInfo {
            id,
            window_id: window,
            title: title.to_string(),
        });
        if let Some(tab) = inner.tabs.iter_mut().find(|t| t.id == tab) {
            tab.group_id = Some(id);
        }
        Ok(id)
    }

    async fn add_to_group(&self, group: GroupId, tab: TabId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(tab) = inner.tabs.iter_mut().find(|t| t.id == tab) {
            tab.group_id = Some(group);
        }
        Ok(())
    }

    async fn ungroup(&self, tab: TabId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(tab) = inner.tabs.iter_mut().find(|t| t.id == tab) {
            tab.group_id = None;
        }
        Ok(())
    }
}
