use chrono::{DateTime, Utc};

/// The single open time interval: which project is being tracked and since
/// when. At most one exists at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveInterval {
    pub project: String,
    pub started_at: DateTime<Utc>,
}

/// Tracking state shared by all event handlers. Transition methods take
/// explicit `now` values so tests can drive simulated clocks.
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    current: Option<ActiveInterval>,
    idle: bool,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.current.is_some()
    }

    pub fn tracked_project(&self) -> Option<&str> {
        self.current.as_ref().map(|interval| interval.project.as_str())
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn set_idle(&mut self, idle: bool) {
        self.idle = idle;
    }

    /// Opens an interval for `project` starting at `now`, replacing any open
    /// one. Callers checkpoint first so the old interval's time is not lost.
    pub fn start(&mut self, project: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some(ActiveInterval {
            project: project.into(),
            started_at: now,
        });
    }

    /// Unconditional stop: drops the open interval without booking time.
    pub fn stop(&mut self) {
        self.current = None;
    }

    /// Checkpoints the open interval: re-anchors `started_at` to `now` and
    /// returns the elapsed (project, seconds) pair when it exceeds
    /// `min_secs`. Shorter spans are dropped as focus-flick noise, and a
    /// backwards clock yields nothing. Tracking itself never ends here.
    pub fn checkpoint(&mut self, now: DateTime<Utc>, min_secs: f64) -> Option<(String, f64)> {
        let interval = self.current.as_mut()?;
        let elapsed = (now - interval.started_at).num_milliseconds() as f64 / 1000.0;
        interval.started_at = now;
        (elapsed > min_secs).then(|| (interval.project.clone(), elapsed))
    }
}
