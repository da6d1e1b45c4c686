//! A single running search

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{at, bounded, select, Receiver, RecvError, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use nanovanity_chains::Chain;
use nanovanity_crypto::Seed;
use nanovanity_pattern::{PatternMatcher, VanitySpec};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::event::{EventBus, SearchEvent, ThroughputSample};
use crate::worker::{SearchWorker, StopSignal, WorkerExit, WorkerMessage};

/// The winning seed and address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub seed: Seed,
    pub address: String,
    /// Worker that found it
    pub worker_id: usize,
    /// Trials counted across the pool when the match arrived
    pub checks: u64,
    /// Milliseconds from session start to the match
    pub elapsed_ms: f64,
}

/// Longest wait between two throughput refreshes
pub const MAX_ESTIMATE_DELAY: Duration = Duration::from_secs(3600);

/// Widening delays between throughput refreshes, capped at [`MAX_ESTIMATE_DELAY`]
#[derive(Debug, Clone, Copy)]
pub struct EstimateSchedule {
    delay: Duration,
    backoff: f64,
}

impl EstimateSchedule {
    pub fn new(initial: Duration, backoff: f64) -> Self {
        Self {
            delay: initial.min(MAX_ESTIMATE_DELAY),
            backoff,
        }
    }

    /// Delay until the next refresh
    pub fn current(&self) -> Duration {
        self.delay
    }

    /// Advance after a refresh fired, returning the new delay
    pub fn advance(&mut self) -> Duration {
        self.delay = Duration::try_from_secs_f64(self.delay.as_secs_f64() * self.backoff)
            .map_or(MAX_ESTIMATE_DELAY, |next| next.min(MAX_ESTIMATE_DELAY));
        self.delay
    }
}

enum Step {
    Message(std::result::Result<WorkerMessage, RecvError>),
    Refresh,
    Cancel,
}

struct WorkerSlot {
    id: usize,
    handle: Option<JoinHandle<WorkerExit>>,
    alive: bool,
}

/// Session state. Only the control loop in [`SearchSession::run`] mutates it.
pub(crate) struct SearchSession {
    matcher: PatternMatcher,
    chain: Arc<dyn Chain>,
    config: SearchConfig,
    events: Arc<EventBus>,
    stop: StopSignal,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    cancel_rx: Receiver<()>,
    workers: Vec<WorkerSlot>,
    checks: u64,
    started: Instant,
    respawns_left: usize,
    resolved: bool,
}

impl SearchSession {
    /// Spawn `worker_count` workers for an already-normalized spec.
    ///
    /// If any spawn fails, the workers already running are stopped and
    /// joined before the error is returned.
    pub(crate) fn spawn(
        spec: VanitySpec,
        worker_count: usize,
        chain: Arc<dyn Chain>,
        config: SearchConfig,
        events: Arc<EventBus>,
        cancel_rx: Receiver<()>,
    ) -> Result<Self> {
        let (tx, rx) = bounded(config.channel_capacity);
        let matcher = PatternMatcher::new(spec, chain.header_len());

        let mut session = Self {
            matcher,
            chain,
            respawns_left: config.max_respawns,
            config,
            events,
            stop: StopSignal::new(),
            tx,
            rx,
            cancel_rx,
            workers: Vec::with_capacity(worker_count),
            checks: 0,
            started: Instant::now(),
            resolved: false,
        };

        for id in 0..worker_count {
            match session.spawn_worker(id) {
                Ok(handle) => session.workers.push(WorkerSlot {
                    id,
                    handle: Some(handle),
                    alive: true,
                }),
                Err(e) => {
                    session.shutdown();
                    return Err(e.into());
                }
            }
            session.events.emit(SearchEvent::WorkerStarted { worker_id: id });
        }

        info!(
            pattern = %session.matcher.spec().pattern,
            position = %session.matcher.spec().position,
            workers = worker_count,
            "search started"
        );
        Ok(session)
    }

    fn spawn_worker(&self, id: usize) -> std::io::Result<JoinHandle<WorkerExit>> {
        SearchWorker::new(
            id,
            self.matcher.clone(),
            self.chain.clone(),
            self.tx.clone(),
            self.stop.clone(),
        )
        .spawn()
    }

    /// Drive the session until the first match, then tear it down
    pub(crate) fn run(mut self) -> Result<MatchResult> {
        let mut schedule = EstimateSchedule::new(
            Duration::from_millis(self.config.estimate_delay_ms),
            self.config.estimate_backoff,
        );
        let mut timer = at(Instant::now() + schedule.current());

        let outcome = loop {
            let step = select! {
                recv(self.rx) -> msg => Step::Message(msg),
                recv(timer) -> _ => Step::Refresh,
                recv(self.cancel_rx) -> _ => Step::Cancel,
            };

            match step {
                Step::Message(Ok(WorkerMessage::Progress)) => self.checks += 1,
                Step::Message(Ok(WorkerMessage::Match {
                    worker_id,
                    seed,
                    address,
                })) => {
                    if let Some(result) = self.resolve(worker_id, seed, address) {
                        break Ok(result);
                    }
                }
                Step::Message(Ok(WorkerMessage::Died { worker_id })) => {
                    if let Err(e) = self.replace_dead_worker(worker_id) {
                        break Err(e);
                    }
                }
                // The session holds a sender, so this only happens if it was dropped
                Step::Message(Err(_)) => break Err(SearchError::AllWorkersLost),
                Step::Refresh => {
                    self.refresh_throughput();
                    timer = at(Instant::now() + schedule.advance());
                }
                Step::Cancel => break Err(SearchError::Cancelled),
            }
        };

        self.shutdown();
        match &outcome {
            Ok(result) => {
                info!(
                    address = %result.address,
                    worker = result.worker_id,
                    checks = result.checks,
                    elapsed_ms = result.elapsed_ms,
                    "match found"
                );
                self.events.emit(SearchEvent::Resolved {
                    checks: result.checks,
                    elapsed_ms: result.elapsed_ms,
                });
            }
            Err(e) => warn!(error = %e, "search ended without a match"),
        }
        outcome
    }

    /// First match wins; anything after it is ignored
    fn resolve(&mut self, worker_id: usize, seed: Seed, address: String) -> Option<MatchResult> {
        if self.resolved {
            return None;
        }
        self.resolved = true;
        Some(MatchResult {
            seed,
            address,
            worker_id,
            checks: self.checks,
            elapsed_ms: self.elapsed_ms(),
        })
    }

    fn sample(&self) -> ThroughputSample {
        ThroughputSample {
            checks: self.checks,
            elapsed_ms: self.elapsed_ms(),
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn refresh_throughput(&self) {
        let sample = self.sample();
        let ms_per_check = sample.milliseconds_per_check();
        debug!(
            checks = sample.checks,
            elapsed_ms = sample.elapsed_ms,
            ms_per_check,
            "throughput refreshed"
        );
        self.events.emit(SearchEvent::Throughput(sample));
    }

    fn replace_dead_worker(&mut self, worker_id: usize) -> Result<()> {
        warn!(worker = worker_id, "worker died");
        self.events.emit(SearchEvent::WorkerDied { worker_id });

        if let Some(slot) = self.workers.iter_mut().find(|w| w.id == worker_id) {
            slot.alive = false;
            if let Some(handle) = slot.handle.take() {
                // The thread is already unwinding; its panic payload is not needed
                let _ = handle.join();
            }
        }

        if self.respawns_left > 0 {
            self.respawns_left -= 1;
            let handle = self.spawn_worker(worker_id)?;
            if let Some(slot) = self.workers.iter_mut().find(|w| w.id == worker_id) {
                slot.handle = Some(handle);
                slot.alive = true;
            }
            info!(worker = worker_id, respawns_left = self.respawns_left, "worker respawned");
            self.events.emit(SearchEvent::WorkerRespawned { worker_id });
            return Ok(());
        }

        if self.workers.iter().all(|w| !w.alive) {
            return Err(SearchError::AllWorkersLost);
        }
        Ok(())
    }

    /// Stop every worker, close the channel and join the threads.
    ///
    /// The receiver is replaced before joining so a worker blocked on a full
    /// channel sees a disconnect instead of waiting forever.
    fn shutdown(&mut self) {
        self.stop.stop();
        let (closed_tx, closed_rx) = bounded(0);
        drop(std::mem::replace(&mut self.rx, closed_rx));
        drop(std::mem::replace(&mut self.tx, closed_tx));

        for slot in &mut self.workers {
            let Some(handle) = slot.handle.take() else {
                continue;
            };
            match handle.join() {
                Ok(exit) => self.events.emit(SearchEvent::WorkerStopped {
                    worker_id: exit.worker_id,
                    trials: exit.trials,
                    reason: exit.reason,
                }),
                Err(_) => warn!(worker = slot.id, "worker panicked during shutdown"),
            }
            slot.alive = false;
        }
    }
}

impl Drop for SearchSession {
    // Workers must not outlive a session whose control loop unwound
    fn drop(&mut self) {
        self.shutdown();
    }
}
