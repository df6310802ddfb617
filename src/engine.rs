//! Event dispatch and the command surface exposed to the embedding UI.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    config::EngineConfig,
    grouping::GroupingController,
    host::{BrowserHost, IdleState, TabId, WindowId},
    models::{builtin_default_patterns, builtin_default_rule, TimeLedger, DEFAULT_RULE_ID},
    store::{LedgerStore, RuleStore},
    tracking::TrackerController,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// The closed set of events the host can deliver. Each is handled to
/// completion before the next is taken, so handlers never interleave except
/// at their own await points.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    TabActivated { tab_id: TabId },
    TabUrlChanged { tab_id: TabId, url: String, is_active: bool },
    WindowFocusChanged { window_id: Option<WindowId> },
    IdleStateChanged { state: IdleState },
    /// Hosts with their own alarm facility deliver this instead of relying on
    /// the controller's built-in ticker.
    FlushTick,
    /// Install or browser startup.
    Startup,
}

pub struct Engine {
    tracker: TrackerController,
    grouping: GroupingController,
    rules: Arc<dyn RuleStore>,
    ledger: Arc<dyn LedgerStore>,
    host: Arc<dyn BrowserHost>,
}

impl Engine {
    pub fn new(
        rules: Arc<dyn RuleStore>,
        ledger: Arc<dyn LedgerStore>,
        host: Arc<dyn BrowserHost>,
        config: EngineConfig,
    ) -> Self {
        let tracker = TrackerController::new(
            rules.clone(),
            ledger.clone(),
            host.clone(),
            config,
        );
        let grouping = GroupingController::new(rules.clone(), host.clone());
        Self {
            tracker,
            grouping,
            rules,
            ledger,
            host,
        }
    }

    pub fn tracker(&self) -> &TrackerController {
        &self.tracker
    }

    /// Consumes host events until the channel closes or `cancel` fires.
    /// Handler failures are logged and dropped; the next event is the retry.
    pub async fn run(&self, mut events: mpsc::Receiver<HostEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        log_info!("event channel closed, engine loop exiting");
                        break;
                    };
                    if let Err(err) = self.handle_event(event).await {
                        log_warn!("event handler failed: {err:#}");
                    }
                }
                _ = cancel.cancelled() => {
                    log_info!("engine loop shutting down");
                    break;
                }
            }
        }
        // Cooperative exit: checkpoint the open interval's tail instead of
        // dropping whatever accrued since the last tick.
        if let Err(err) = self.tracker.stop_tracking().await {
            log_warn!("final flush on shutdown failed: {err:#}");
        }
        self.tracker.stop_ticker().await;
    }

    pub async fn handle_event(&self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::TabActivated { tab_id } => self.on_tab_activated(tab_id).await,
            HostEvent::TabUrlChanged {
                tab_id,
                url,
                is_active,
            } => self.on_tab_url_changed(tab_id, url, is_active).await,
            HostEvent::WindowFocusChanged { window_id } => {
                self.tracker.on_window_focus_changed(window_id).await
            }
            HostEvent::IdleStateChanged { state } => self.tracker.on_idle_changed(state).await,
            HostEvent::FlushTick => self.tracker.flush().await,
            HostEvent::Startup => self.on_startup().await,
        }
    }

    async fn on_tab_activated(&self, tab_id: TabId) -> Result<()> {
        self.bump_switch_count().await;
        let Some(tab) = self.host.get_tab(tab_id).await? else {
            return Ok(());
        };
        self.tracker.begin_tracking(&tab).await
    }

    async fn on_tab_url_changed(&self, tab_id: TabId, url: String, is_active: bool) -> Result<()> {
        // Background navigations don't affect the open interval.
        if !is_active {
            return Ok(());
        }
        let Some(mut tab) = self.host.get_tab(tab_id).await? else {
            return Ok(());
        };
        // The event's URL wins over the host snapshot, which can lag during
        // fast redirect chains.
        tab.url = Some(url);
        self.tracker.begin_tracking(&tab).await
    }

    async fn on_startup(&self) -> Result<()> {
        self.seed_default_rules().await?;
        self.tracker.start_ticker().await;
        Ok(())
    }

    /// Not worth failing a tab switch over; a missed count is tolerable.
    async fn bump_switch_count(&self) {
        let result = async {
            let count = self.ledger.get_switch_count().await?;
            self.ledger.set_switch_count(count + 1).await
        }
        .await;
        if let Err(err) = result {
            log_warn!("failed to bump switch counter: {err:#}");
        }
    }

    /// First-run/upgrade seeding: inserts the built-in rule when absent,
    /// otherwise refreshes only its pattern list so upgrades ship pattern
    /// fixes without clobbering the user's name or color choice.
    pub async fn seed_default_rules(&self) -> Result<()> {
        let mut rules = self.rules.get_rules().await?;
        match rules.iter_mut().find(|rule| rule.id == DEFAULT_RULE_ID) {
            Some(existing) => {
                existing.patterns = builtin_default_patterns();
            }
            None => {
                log_info!("seeding built-in default rule");
                rules.push(builtin_default_rule());
            }
        }
        self.rules.set_rules(rules).await
    }

    // ---- command surface ----------------------------------------------

    pub async fn organize_all_tabs(&self) -> Result<()> {
        let tabs = self.host.query_tabs().await?;
        self.grouping.organize_all(&tabs).await
    }

    pub async fn clear_all_groups(&self) -> Result<()> {
        let tabs = self.host.query_tabs().await?;
        self.grouping.clear_all(&tabs).await
    }

    /// Clears the ledger and the switch counter together.
    pub async fn reset_time_data(&self) -> Result<()> {
        self.ledger.set_ledger(TimeLedger::new()).await?;
        self.ledger.set_switch_count(0).await
    }

    pub async fn get_active_project(&self) -> Option<String> {
        self.tracker.active_project().await
    }

    pub async fn flush_time(&self) -> Result<()> {
        self.tracker.flush().await
    }

    pub async fn set_paused(&self, paused: bool) -> Result<()> {
        self.ledger.set_paused(paused).await?;
        if paused {
            self.tracker.stop_tracking().await
        } else {
            match self.host.active_tab(None).await? {
                Some(tab) => self.tracker.begin_tracking(&tab).await,
                None => Ok(()),
            }
        }
    }
}
