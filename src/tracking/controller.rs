use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{Local, Utc};
use log::{debug, info, warn};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::EngineConfig,
    host::{is_internal_url, BrowserHost, IdleState, TabInfo, WindowId},
    matching::resolve,
    models::UNCATEGORIZED,
    store::{LedgerStore, RuleStore},
};

use super::state::TrackerState;

/// Drives the time-accounting state machine. Cloneable; all clones share the
/// same state, so handlers can run from any task.
///
/// Handlers are short-lived and only suspend on store/host calls; the state
/// mutex is never held across one of those awaits. Two rapid events can still
/// interleave around a suspension point and cost at most one sub-interval,
/// which the per-second ledger tolerates.
#[derive(Clone)]
pub struct TrackerController {
    state: Arc<Mutex<TrackerState>>,
    rules: Arc<dyn RuleStore>,
    ledger: Arc<dyn LedgerStore>,
    host: Arc<dyn BrowserHost>,
    config: EngineConfig,
    ticker: Arc<Mutex<Option<(CancellationToken, JoinHandle<()>)>>>,
}

impl TrackerController {
    pub fn new(
        rules: Arc<dyn RuleStore>,
        ledger: Arc<dyn LedgerStore>,
        host: Arc<dyn BrowserHost>,
        config: EngineConfig,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState::new())),
            rules,
            ledger,
            host,
            config,
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    /// Switches tracking to `tab`: checkpoints the open interval, resolves
    /// the tab's project, and opens a fresh interval. When tracking is paused
    /// or the user is idle this is a full stop instead.
    pub async fn begin_tracking(&self, tab: &TabInfo) -> Result<()> {
        let paused = match self.ledger.get_paused().await {
            Ok(paused) => paused,
            Err(err) => {
                warn!("could not read paused flag, assuming not paused: {err:#}");
                false
            }
        };
        let idle = self.state.lock().await.is_idle();
        if paused || idle {
            return self.stop_tracking().await;
        }

        self.flush().await?;

        let project = self.resolve_tab(tab).await?;
        debug!("tracking '{project}' (tab {})", tab.id.0);
        self.state.lock().await.start(project, Utc::now());
        Ok(())
    }

    async fn resolve_tab(&self, tab: &TabInfo) -> Result<String> {
        let url = tab.url.as_deref().unwrap_or("");
        if url.is_empty() || is_internal_url(url) {
            return Ok(UNCATEGORIZED.to_string());
        }
        let rules = self.rules.get_rules().await?;
        let title = tab.title.as_deref().unwrap_or("");
        Ok(resolve(url, title, &rules)
            .map(|rule| rule.name.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string()))
    }

    /// Checkpoints the open interval into the ledger. Never ends tracking;
    /// with nothing open this is a no-op.
    pub async fn flush(&self) -> Result<()> {
        let checkpointed = {
            let mut state = self.state.lock().await;
            state.checkpoint(Utc::now(), self.config.min_flush_secs)
        };
        let Some((project, seconds)) = checkpointed else {
            return Ok(());
        };

        // Day attribution uses the wall-clock date at flush time; an interval
        // spanning midnight books wholly to the later day.
        let today = Local::now().date_naive();
        let mut ledger = self.ledger.get_ledger().await?;
        ledger.record(today, &project, seconds);
        ledger.prune(today, self.config.retention_days);
        self.ledger.set_ledger(ledger).await?;
        debug!("flushed {seconds:.1}s to '{project}'");
        Ok(())
    }

    /// Unconditional stop: flush, then drop the interval.
    pub async fn stop_tracking(&self) -> Result<()> {
        self.flush().await?;
        self.state.lock().await.stop();
        Ok(())
    }

    pub async fn on_idle_changed(&self, idle_state: IdleState) -> Result<()> {
        match idle_state {
            IdleState::Idle | IdleState::Locked => {
                self.state.lock().await.set_idle(true);
                self.stop_tracking().await
            }
            IdleState::Active => {
                self.state.lock().await.set_idle(false);
                match self.host.active_tab(None).await? {
                    Some(tab) => self.begin_tracking(&tab).await,
                    None => Ok(()),
                }
            }
        }
    }

    pub async fn on_window_focus_changed(&self, window: Option<WindowId>) -> Result<()> {
        match window {
            None => self.stop_tracking().await,
            Some(window) => match self.host.active_tab(Some(window)).await? {
                Some(tab) => self.begin_tracking(&tab).await,
                None => Ok(()),
            },
        }
    }

    pub async fn active_project(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .tracked_project()
            .map(str::to_string)
    }

    /// Starts the safety-net flush ticker, replacing any previous one. Bounds
    /// the time lost to an unclean shutdown to one period.
    pub async fn start_ticker(&self) {
        let mut guard = self.ticker.lock().await;
        if let Some((token, handle)) = guard.take() {
            token.cancel();
            handle.abort();
        }

        let token = CancellationToken::new();
        let loop_token = token.clone();
        let controller = self.clone();
        let period = Duration::from_secs(self.config.flush_interval_secs.max(1));

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = controller.flush().await {
                            warn!("periodic flush failed: {err:#}");
                        }
                    }
                    _ = loop_token.cancelled() => {
                        info!("flush ticker shutting down");
                        break;
                    }
                }
            }
        });

        *guard = Some((token, handle));
    }

    pub async fn stop_ticker(&self) {
        if let Some((token, handle)) = self.ticker.lock().await.take() {
            token.cancel();
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{ProjectColor, ProjectRule},
        store::MemoryStore,
        testutil::FakeHost,
        host::TabId,
    };

    fn tab(id: i64, url: &str, title: &str) -> TabInfo {
        TabInfo {
            id: TabId(id),
            window_id: WindowId(1),
            url: (!url.is_empty()).then(|| url.to_string()),
            title: (!title.is_empty()).then(|| title.to_string()),
            group_id: None,
        }
    }

    async fn controller_with(
        rules: Vec<ProjectRule>,
        host: Arc<FakeHost>,
    ) -> (TrackerController, MemoryStore) {
        let store = MemoryStore::new();
        store.set_rules(rules).await.unwrap();
        let controller = TrackerController::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            host,
            EngineConfig::default(),
        );
        (controller, store)
    }

    fn docs_rule() -> ProjectRule {
        ProjectRule::new("Docs", ProjectColor::Blue, vec!["*docs.google.com*".into()])
    }

    #[tokio::test]
    async fn begin_tracking_resolves_and_opens_an_interval() {
        let host = Arc::new(FakeHost::new(vec![]));
        let (controller, _) = controller_with(vec![docs_rule()], host).await;

        controller
            .begin_tracking(&tab(1, "https://docs.google.com/d/1", "Spec - Google Docs"))
            .await
            .unwrap();
        assert_eq!(controller.active_project().await.as_deref(), Some("Docs"));
    }

    #[tokio::test]
    async fn unmatched_and_internal_tabs_track_as_uncategorized() {
        let host = Arc::new(FakeHost::new(vec![]));
        let (controller, _) = controller_with(vec![docs_rule()], host).await;

        controller
            .begin_tracking(&tab(1, "https://example.com", "Misc"))
            .await
            .unwrap();
        assert_eq!(
            controller.active_project().await.as_deref(),
            Some(UNCATEGORIZED)
        );

        controller
            .begin_tracking(&tab(2, "chrome://settings", "Settings"))
            .await
            .unwrap();
        assert_eq!(
            controller.active_project().await.as_deref(),
            Some(UNCATEGORIZED)
        );

        controller.begin_tracking(&tab(3, "", "No URL")).await.unwrap();
        assert_eq!(
            controller.active_project().await.as_deref(),
            Some(UNCATEGORIZED)
        );
    }

    #[tokio::test]
    async fn paused_flag_stops_instead_of_opening() {
        let host = Arc::new(FakeHost::new(vec![]));
        let (controller, store) = controller_with(vec![docs_rule()], host).await;

        controller
            .begin_tracking(&tab(1, "https://docs.google.com/d/1", "Spec"))
            .await
            .unwrap();
        store.set_paused(true).await.unwrap();

        controller
            .begin_tracking(&tab(2, "https://docs.google.com/d/2", "Other"))
            .await
            .unwrap();
        assert_eq!(controller.active_project().await, None);
    }

    #[tokio::test]
    async fn idle_stops_and_active_resumes_on_the_active_tab() {
        let active = tab(5, "https://docs.google.com/d/9", "Spec - Google Docs");
        let host = Arc::new(FakeHost::new(vec![active.clone()]));
        host.set_active_tab(WindowId(1), TabId(5));
        let (controller, _) = controller_with(vec![docs_rule()], host).await;

        controller.begin_tracking(&active).await.unwrap();
        controller
            .on_idle_changed(IdleState::Idle)
            .await
            .unwrap();
        assert_eq!(controller.active_project().await, None);

        // While idle, activations are ignored.
        controller.begin_tracking(&active).await.unwrap();
        assert_eq!(controller.active_project().await, None);

        controller
            .on_idle_changed(IdleState::Active)
            .await
            .unwrap();
        assert_eq!(controller.active_project().await.as_deref(), Some("Docs"));
    }

    #[tokio::test]
    async fn losing_all_window_focus_stops_tracking() {
        let active = tab(5, "https://docs.google.com/d/9", "Spec");
        let host = Arc::new(FakeHost::new(vec![active.clone()]));
        host.set_active_tab(WindowId(1), TabId(5));
        let (controller, _) = controller_with(vec![docs_rule()], host).await;

        controller.begin_tracking(&active).await.unwrap();
        controller.on_window_focus_changed(None).await.unwrap();
        assert_eq!(controller.active_project().await, None);

        controller
            .on_window_focus_changed(Some(WindowId(1)))
            .await
            .unwrap();
        assert_eq!(controller.active_project().await.as_deref(), Some("Docs"));
    }

    #[tokio::test]
    async fn flush_with_nothing_tracked_leaves_the_ledger_untouched() {
        let host = Arc::new(FakeHost::new(vec![]));
        let (controller, store) = controller_with(vec![], host).await;

        controller.flush().await.unwrap();
        controller.flush().await.unwrap();
        assert!(store.get_ledger().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quick_switches_book_nothing_but_keep_tracking() {
        let host = Arc::new(FakeHost::new(vec![]));
        let (controller, store) = controller_with(vec![docs_rule()], host).await;

        // Two sub-second switches: the flush inside the second begin sees a
        // sub-threshold interval and drops it.
        controller
            .begin_tracking(&tab(1, "https://docs.google.com/d/1", "A"))
            .await
            .unwrap();
        controller
            .begin_tracking(&tab(2, "https://example.com", "B"))
            .await
            .unwrap();

        assert!(store.get_ledger().await.unwrap().is_empty());
        assert_eq!(
            controller.active_project().await.as_deref(),
            Some(UNCATEGORIZED)
        );
    }
}
