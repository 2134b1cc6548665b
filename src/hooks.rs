//! Reactive counter state for a page component.
//!
//! Each hook owns a `watch` channel; views subscribe and re-render on change.
//! `mount`/`unmount` bracket the component lifetime, and anything that
//! resolves after `unmount` is dropped instead of published.

use crate::client::StatsApi;
use crate::models::LikeStats;
use crate::pluralize::pluralize_views;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitState {
    pub count: u64,
    pub is_loading: bool,
}

impl Default for VisitState {
    fn default() -> Self {
        Self {
            count: 0,
            is_loading: true,
        }
    }
}

impl VisitState {
    /// Counter caption, e.g. "42 просмотра".
    pub fn label(&self) -> String {
        format!("{} {}", self.count, pluralize_views(self.count))
    }
}

pub struct VisitHook {
    api: Arc<dyn StatsApi>,
    state: watch::Sender<VisitState>,
    mounted: AtomicBool,
    incremented: AtomicBool,
}

impl VisitHook {
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(VisitState::default()),
            mounted: AtomicBool::new(false),
            incremented: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<VisitState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> VisitState {
        *self.state.borrow()
    }

    /// Reads the count, then records this page view. The increment happens
    /// at most once per hook, however many times it is mounted.
    pub async fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);

        let count = self.api.visit_count().await.unwrap_or_default();
        if !self.publish(VisitState {
            count,
            is_loading: false,
        }) {
            return;
        }

        if self.incremented.swap(true, Ordering::SeqCst) {
            debug!("visit already recorded for this hook");
            return;
        }

        let count = match self.api.increment_visit().await {
            Ok(count) => count,
            Err(err) => {
                warn!("visit increment failed: {err}");
                self.api.visit_count().await.unwrap_or_default()
            }
        };
        self.publish(VisitState {
            count,
            is_loading: false,
        });
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    fn publish(&self, next: VisitState) -> bool {
        if !self.mounted.load(Ordering::SeqCst) {
            return false;
        }
        self.state.send_replace(next);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub count: u64,
    pub is_liked: bool,
    pub is_loading: bool,
    pub toggling: bool,
}

impl Default for LikeState {
    fn default() -> Self {
        Self {
            count: 0,
            is_liked: false,
            is_loading: true,
            toggling: false,
        }
    }
}

impl LikeState {
    pub fn stats(&self) -> LikeStats {
        LikeStats {
            count: self.count,
            is_liked: self.is_liked,
        }
    }
}

/// Outcome of one pass through `Idle -> Toggling -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Confirmed(LikeStats),
    RolledBack(LikeStats),
}

fn speculate(previous: LikeStats) -> LikeStats {
    if previous.is_liked {
        LikeStats {
            count: previous.count.saturating_sub(1),
            is_liked: false,
        }
    } else {
        LikeStats {
            count: previous.count.saturating_add(1),
            is_liked: true,
        }
    }
}

pub struct LikeHook {
    api: Arc<dyn StatsApi>,
    state: watch::Sender<LikeState>,
    mounted: AtomicBool,
    // Held for a whole toggle so a second click waits for the first to settle.
    toggle_gate: Mutex<()>,
}

impl LikeHook {
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(LikeState::default()),
            mounted: AtomicBool::new(false),
            toggle_gate: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LikeState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LikeState {
        *self.state.borrow()
    }

    pub async fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
        let stats = self.api.like_stats().await.unwrap_or_default();
        self.publish(|state| {
            state.count = stats.count;
            state.is_liked = stats.is_liked;
            state.is_loading = false;
        });
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Shows the flipped state at once, then replaces it with the server's
    /// answer, or restores the exact pre-click values if the call fails.
    pub async fn toggle(&self) -> ToggleOutcome {
        let _gate = self.toggle_gate.lock().await;

        let previous = self.state().stats();
        let optimistic = speculate(previous);
        self.publish(|state| {
            state.count = optimistic.count;
            state.is_liked = optimistic.is_liked;
            state.toggling = true;
        });

        let outcome = match self.api.toggle_like(previous.is_liked).await {
            Ok(stats) => ToggleOutcome::Confirmed(stats),
            Err(err) => {
                warn!("like toggle failed, rolling back: {err}");
                ToggleOutcome::RolledBack(previous)
            }
        };

        let settled = match outcome {
            ToggleOutcome::Confirmed(stats) | ToggleOutcome::RolledBack(stats) => stats,
        };
        self.publish(|state| {
            state.count = settled.count;
            state.is_liked = settled.is_liked;
            state.toggling = false;
        });
        outcome
    }

    fn publish(&self, update: impl FnOnce(&mut LikeState)) -> bool {
        if !self.mounted.load(Ordering::SeqCst) {
            return false;
        }
        self.state.send_modify(update);
        true
    }
}
