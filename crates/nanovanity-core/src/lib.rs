//! NanoVanity Core Engine
//!
//! The search engine: worker threads sample seeds and test addresses, a
//! coordinator counts their progress, publishes throughput refreshes and
//! resolves on the first match.

mod config;
mod error;
mod event;
mod search;
mod session;
mod worker;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use event::{ExitReason, SearchEvent, ThroughputSample};
pub use search::SearchCoordinator;
pub use session::{EstimateSchedule, MatchResult, MAX_ESTIMATE_DELAY};
pub use worker::{SearchWorker, StopSignal, WorkerExit, WorkerMessage};

// Re-exports for convenience
pub use nanovanity_chains::{Chain, DerivedAccount, NanoChain, NANO, XRB};
pub use nanovanity_crypto::Seed;
pub use nanovanity_pattern::{
    format_difficulty, format_duration, is_valid_pattern, matches, Estimate, EstimateModel,
    PatternError, PatternMatcher, Position, VanitySpec, DEFAULT_MS_PER_CHECK, MAX_PATTERN_LEN,
};
