//! NanoVanity Pattern Matching Engine
//!
//! Vanity spec validation, position matching and search time estimates.

mod matcher;
mod estimate;

pub use matcher::{
    is_valid_pattern, matches, PatternError, PatternMatcher, Position, VanitySpec,
    MAX_PATTERN_LEN, MIN_HEADER_LEN,
};
pub use estimate::{
    format_difficulty, format_duration, Estimate, EstimateModel, ADDRESS_BODY_LEN, ALPHABET_SIZE,
    DEFAULT_MS_PER_CHECK,
};
