/// Global token store with generation-guarded publishing
///
/// The store owns the published token set plus the loading/error state the
/// dashboard reads. Every refresh pass runs under a generation number taken
/// from `begin_refresh`; publishes from a superseded generation are
/// discarded, so a slow old pass can never clobber a newer one.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use tokio::sync::{Notify, RwLock};

use crate::logger::{self, LogTag};
use crate::tokens::types::ScoredToken;

static GLOBAL_STORE: Lazy<Arc<TokenStore>> = Lazy::new(|| Arc::new(TokenStore::new()));

/// Snapshot of the store state as the dashboard consumes it
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub tokens: Vec<ScoredToken>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct TokenStore {
    state: RwLock<StoreSnapshot>,
    /// Latest refresh generation; only the newest may publish
    generation: AtomicU64,
    shutdown: Notify,
    shutting_down: AtomicBool,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreSnapshot::default()),
            generation: AtomicU64::new(0),
            shutdown: Notify::new(),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Start a new refresh pass; returns the generation the pass must use
    /// when publishing
    pub async fn begin_refresh(&self) -> u64 {
        let generation = self.generation.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
        generation
    }

    /// Publish a (possibly partial) token set for a generation
    ///
    /// Returns false when the generation has been superseded and the
    /// publish was discarded.
    pub async fn publish(&self, generation: u64, tokens: Vec<ScoredToken>) -> bool {
        if generation != self.generation.load(AtomicOrdering::SeqCst) {
            logger::debug(
                LogTag::Aggregator,
                &format!("Discarding stale publish: generation={}", generation),
            );
            return false;
        }

        let mut state = self.state.write().await;
        state.tokens = tokens;
        state.last_updated = Some(Utc::now());
        true
    }

    /// Mark a pass as finished; an Err leaves the previous token set intact
    /// and records the error for the dashboard
    pub async fn finish(&self, generation: u64, result: Result<(), String>) {
        if generation != self.generation.load(AtomicOrdering::SeqCst) {
            return;
        }

        let mut state = self.state.write().await;
        state.loading = false;
        state.error = result.err();
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    pub async fn tokens(&self) -> Vec<ScoredToken> {
        self.state.read().await.tokens.clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(AtomicOrdering::SeqCst)
    }

    /// Stop the periodic refresh service
    pub fn teardown(&self) {
        self.shutting_down.store(true, AtomicOrdering::SeqCst);
        self.shutdown.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(AtomicOrdering::SeqCst)
    }

    pub async fn wait_for_teardown(&self) {
        let notified = self.shutdown.notified();
        tokio::pin!(notified);
        // Register before re-checking the flag so a teardown between the
        // check and the await is not missed
        notified.as_mut().enable();
        if self.is_shutting_down() {
            return;
        }
        notified.await;
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn global_store() -> Arc<TokenStore> {
    GLOBAL_STORE.clone()
}

pub async fn get_tokens() -> Vec<ScoredToken> {
    global_store().tokens().await
}

pub async fn get_snapshot() -> StoreSnapshot {
    global_store().snapshot().await
}

pub fn teardown_store() {
    global_store().teardown();
}
