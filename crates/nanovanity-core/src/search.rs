//! Vanity search coordinator

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver};
use tracing::debug;

use nanovanity_chains::Chain;
use nanovanity_pattern::VanitySpec;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::event::{EventBus, SearchEvent};
use crate::session::{MatchResult, SearchSession};

/// Set while any search in the process is running
static SEARCHING: AtomicBool = AtomicBool::new(false);

/// Holds the process-wide search slot until dropped (`Idle -> Searching -> Idle`)
struct ActiveSearch;

impl ActiveSearch {
    fn acquire() -> Result<Self> {
        SEARCHING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SearchError::ConcurrentSearchNotAllowed)?;
        Ok(Self)
    }
}

impl Drop for ActiveSearch {
    fn drop(&mut self) {
        SEARCHING.store(false, Ordering::Release);
    }
}

/// Runs a vanity search over a pool of worker threads.
///
/// Only one search may run per process, however many coordinators exist.
pub struct SearchCoordinator {
    chain: Arc<dyn Chain>,
    config: SearchConfig,
    events: Arc<EventBus>,
}

impl SearchCoordinator {
    pub fn new(chain: Arc<dyn Chain>, config: SearchConfig) -> Self {
        Self {
            chain,
            config,
            events: Arc::new(EventBus::default()),
        }
    }

    /// Register an observer for throughput refreshes and worker lifecycle events
    pub fn subscribe(&self) -> Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Whether a search is running anywhere in the process
    pub fn is_searching(&self) -> bool {
        SEARCHING.load(Ordering::Acquire)
    }

    pub fn chain(&self) -> &dyn Chain {
        self.chain.as_ref()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for a seed whose address satisfies `spec`, using `workers`
    /// threads (0 = one per CPU).
    ///
    /// The pattern is validated and the single-search guard taken before
    /// any worker is spawned. Dropping the returned future cancels the
    /// search; the coordinator stays busy until its workers have exited.
    pub async fn start(&self, spec: VanitySpec, workers: usize) -> Result<MatchResult> {
        let spec = spec.normalize()?;
        self.config.validate()?;
        let active = ActiveSearch::acquire()?;

        let workers = if workers == 0 { num_cpus::get() } else { workers };
        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let session = SearchSession::spawn(
            spec,
            workers,
            self.chain.clone(),
            self.config.clone(),
            self.events.clone(),
            cancel_rx,
        )?;

        let outcome = tokio::task::spawn_blocking(move || {
            let _active = active;
            session.run()
        })
        .await
        .map_err(|e| SearchError::Join(e.to_string()))?;

        drop(cancel_tx);
        debug!(ok = outcome.is_ok(), "search session closed");
        outcome
    }
}
