//! Search workers
//!
//! Each worker is an OS thread that shares nothing mutable with its peers or
//! the coordinator. It receives its task once at spawn and talks back only
//! through its message channel.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::debug;

use nanovanity_chains::Chain;
use nanovanity_crypto::Seed;
use nanovanity_pattern::PatternMatcher;

use crate::event::ExitReason;

/// Worker -> coordinator messages
#[derive(Debug)]
pub enum WorkerMessage {
    /// One trial finished, whatever its outcome
    Progress,
    /// A trial matched
    Match {
        worker_id: usize,
        seed: Seed,
        address: String,
    },
    /// The worker thread is unwinding from a panic
    Died { worker_id: usize },
}

/// Cooperative stop flag shared by a session's workers.
///
/// Workers check it once per trial, so a worker stops at most one
/// derivation and one check after `stop` is called.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// How a worker's loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    pub worker_id: usize,
    pub trials: u64,
    pub reason: ExitReason,
}

/// Reports the worker's death if its thread unwinds
struct DeathNotice {
    worker_id: usize,
    tx: Sender<WorkerMessage>,
}

impl Drop for DeathNotice {
    fn drop(&mut self) {
        if thread::panicking() {
            let _ = self.tx.send(WorkerMessage::Died {
                worker_id: self.worker_id,
            });
        }
    }
}

/// A single search thread
pub struct SearchWorker {
    id: usize,
    matcher: PatternMatcher,
    chain: Arc<dyn Chain>,
    tx: Sender<WorkerMessage>,
    stop: StopSignal,
}

impl SearchWorker {
    pub fn new(
        id: usize,
        matcher: PatternMatcher,
        chain: Arc<dyn Chain>,
        tx: Sender<WorkerMessage>,
        stop: StopSignal,
    ) -> Self {
        Self {
            id,
            matcher,
            chain,
            tx,
            stop,
        }
    }

    /// Run the worker on its own named thread
    pub fn spawn(self) -> io::Result<JoinHandle<WorkerExit>> {
        thread::Builder::new()
            .name(format!("nanovanity-worker-{}", self.id))
            .spawn(move || self.run())
    }

    /// Sample, derive, check and report until matched or stopped
    pub fn run(self) -> WorkerExit {
        let _notice = DeathNotice {
            worker_id: self.id,
            tx: self.tx.clone(),
        };
        let mut trials = 0u64;

        let reason = loop {
            if self.stop.is_stopped() {
                break ExitReason::Cancelled;
            }

            let seed = Seed::random();
            let address = self.chain.derive(&seed);
            let matched = self.matcher.matches(&address);
            trials += 1;

            if self.tx.send(WorkerMessage::Progress).is_err() {
                break self.disconnect_reason();
            }

            if matched {
                let _ = self.tx.send(WorkerMessage::Match {
                    worker_id: self.id,
                    seed,
                    address,
                });
                break ExitReason::Matched;
            }
        };

        debug!(worker = self.id, trials, ?reason, "worker exiting");
        WorkerExit {
            worker_id: self.id,
            trials,
            reason,
        }
    }

    // A closed channel after a stop is an ordinary cancellation
    fn disconnect_reason(&self) -> ExitReason {
        if self.stop.is_stopped() {
            ExitReason::Cancelled
        } else {
            ExitReason::Disconnected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use nanovanity_chains::DerivedAccount;
    use nanovanity_pattern::VanitySpec;

    struct FixedChain(&'static str);

    impl Chain for FixedChain {
        fn ticker(&self) -> &'static str {
            "TEST"
        }
        fn name(&self) -> &'static str {
            "Fixed"
        }
        fn derive(&self, _seed: &Seed) -> String {
            self.0.to_string()
        }
        fn derive_account(&self, seed: &Seed) -> DerivedAccount {
            DerivedAccount {
                address: self.derive(seed),
                private_key_hex: String::new(),
                public_key_hex: String::new(),
                chain: "TEST".into(),
            }
        }
        fn valid_address_chars(&self) -> &'static str {
            "13456789abcdefghijkmnopqrstuwxyz"
        }
        fn address_prefix(&self) -> &'static str {
            "xrb_"
        }
        fn header_len(&self) -> usize {
            5
        }
    }

    fn worker(address: &'static str, tx: Sender<WorkerMessage>, stop: StopSignal) -> SearchWorker {
        let matcher = PatternMatcher::new(VanitySpec::prefix("cat"), 5);
        SearchWorker::new(3, matcher, Arc::new(FixedChain(address)), tx, stop)
    }

    #[test]
    fn test_stopped_worker_does_no_trials() {
        let (tx, rx) = unbounded();
        let stop = StopSignal::new();
        stop.stop();

        let exit = worker("xrb_1cat", tx, stop).run();

        assert_eq!(exit.reason, ExitReason::Cancelled);
        assert_eq!(exit.trials, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_match_ticks_then_reports() {
        let (tx, rx) = unbounded();

        let exit = worker("xrb_1catzz", tx, StopSignal::new()).run();

        assert_eq!(exit.reason, ExitReason::Matched);
        assert_eq!(exit.trials, 1);
        assert!(matches!(rx.try_recv(), Ok(WorkerMessage::Progress)));
        match rx.try_recv() {
            Ok(WorkerMessage::Match {
                worker_id, address, ..
            }) => {
                assert_eq!(worker_id, 3);
                assert_eq!(address, "xrb_1catzz");
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_stop_signal_ends_running_worker() {
        let (tx, rx) = unbounded();
        let stop = StopSignal::new();
        let handle = worker("xrb_1dog", tx, stop.clone()).spawn().unwrap();

        // Wait until it is demonstrably looping
        assert!(matches!(rx.recv(), Ok(WorkerMessage::Progress)));
        stop.stop();

        let exit = handle.join().unwrap();
        assert_eq!(exit.reason, ExitReason::Cancelled);
        assert!(exit.trials >= 1);
    }

    #[test]
    fn test_closed_channel_without_stop_is_disconnect() {
        let (tx, rx) = unbounded();
        drop(rx);

        let exit = worker("xrb_1dog", tx, StopSignal::new()).run();

        assert_eq!(exit.reason, ExitReason::Disconnected);
        assert_eq!(exit.trials, 1);
    }
}
