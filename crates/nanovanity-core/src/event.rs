//! Observable search events

use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Aggregate progress at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputSample {
    /// Trials completed across all workers
    pub checks: u64,
    /// Milliseconds since the session started
    pub elapsed_ms: f64,
}

impl ThroughputSample {
    /// Wall-clock milliseconds per check across the whole pool.
    ///
    /// Counts at least one check so an idle start does not divide by zero.
    pub fn milliseconds_per_check(&self) -> f64 {
        self.elapsed_ms / self.checks.max(1) as f64
    }

    /// Checks per millisecond across the whole pool
    pub fn checks_per_ms(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            self.checks as f64 / self.elapsed_ms
        } else {
            0.0
        }
    }

    /// Milliseconds one worker spends per check, assuming `workers` share the load
    pub fn per_worker_ms_per_check(&self, workers: usize) -> f64 {
        self.milliseconds_per_check() * workers.max(1) as f64
    }
}

/// Why a worker left its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// It found the match
    Matched,
    /// It saw the stop signal
    Cancelled,
    /// The coordinator stopped listening
    Disconnected,
}

/// Events a session publishes to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchEvent {
    WorkerStarted { worker_id: usize },
    /// Periodic throughput refresh; intervals widen over time
    Throughput(ThroughputSample),
    WorkerDied { worker_id: usize },
    WorkerRespawned { worker_id: usize },
    WorkerStopped {
        worker_id: usize,
        trials: u64,
        reason: ExitReason,
    },
    Resolved { checks: u64, elapsed_ms: f64 },
}

/// Fan-out of events to registered observers
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    observers: Mutex<Vec<Sender<SearchEvent>>>,
}

impl EventBus {
    pub(crate) fn subscribe(&self) -> Receiver<SearchEvent> {
        let (tx, rx) = unbounded();
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// Deliver to every observer, dropping the ones whose receiver is gone
    pub(crate) fn emit(&self, event: SearchEvent) {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}
