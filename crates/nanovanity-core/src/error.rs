use thiserror::Error;

use nanovanity_pattern::PatternError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    #[error("Can only search for one address at a time")]
    ConcurrentSearchNotAllowed,

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Every worker died and the respawn budget is spent")]
    AllWorkersLost,

    #[error("Search was cancelled")]
    Cancelled,

    #[error("Search task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
