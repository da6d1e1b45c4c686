//! Probability and time estimates for vanity searches

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PatternError, Position, VanitySpec};

/// Symbols in the Nano base32 alphabet
pub const ALPHABET_SIZE: u32 = 32;

/// Characters after the `xrb_`/`nano_` prefix: 52 key chars + 8 checksum chars.
///
/// `Anywhere` matching scans the whole address, header included, but the
/// `Corrected` model only counts offsets inside this body. A pattern found in
/// the fixed prefix (`nan` in every `nano_` address) is not modelled.
pub const ADDRESS_BODY_LEN: usize = 60;

/// Per-worker milliseconds per check before any throughput is measured
pub const DEFAULT_MS_PER_CHECK: f64 = 800.0;

/// Probability model for `Anywhere` searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateModel {
    /// One chance per trial, as for prefix/suffix. Underestimates the odds.
    Legacy,
    /// One chance per offset the pattern fits at in the address body
    #[default]
    Corrected,
}

impl FromStr for EstimateModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(EstimateModel::Legacy),
            "corrected" => Ok(EstimateModel::Corrected),
            _ => Err(format!("Unknown estimate model: {}", s)),
        }
    }
}

impl fmt::Display for EstimateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateModel::Legacy => write!(f, "legacy"),
            EstimateModel::Corrected => write!(f, "corrected"),
        }
    }
}

/// Estimates for one pattern length and position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pattern_len: usize,
    position: Position,
    model: EstimateModel,
}

impl Estimate {
    pub fn new(pattern_len: usize, position: Position, model: EstimateModel) -> Self {
        Self {
            pattern_len,
            position,
            model,
        }
    }

    /// Estimate for a spec, validating it first
    pub fn for_spec(spec: &VanitySpec, model: EstimateModel) -> Result<Self, PatternError> {
        let spec = spec.clone().normalize()?;
        Ok(Self::new(spec.len(), spec.position, model))
    }

    /// Chance that one fixed offset matches: `C^-L`
    pub fn single_offset_probability(&self) -> f64 {
        (ALPHABET_SIZE as f64).powi(-(self.pattern_len as i32))
    }

    /// Offsets a match can occur at per trial
    fn opportunities(&self) -> f64 {
        match (self.position, self.model) {
            (Position::Anywhere, EstimateModel::Corrected) => {
                (ADDRESS_BODY_LEN as f64 - self.pattern_len as f64 + 1.0).max(1.0)
            }
            _ => 1.0,
        }
    }

    /// `ln(1 - p)` for one trial.
    ///
    /// Computed with `ln_1p` so tiny probabilities do not round to zero.
    fn log_miss(&self) -> f64 {
        self.opportunities() * (-self.single_offset_probability()).ln_1p()
    }

    /// Chance that a single trial succeeds
    pub fn success_probability(&self) -> f64 {
        -self.log_miss().exp_m1()
    }

    /// Trials needed to reach `confidence` chance of at least one match:
    /// `ceil(ln(1 - confidence) / ln(1 - p))`
    pub fn expected_trials(&self, confidence: f64) -> f64 {
        if confidence <= 0.0 {
            return 0.0;
        }
        if confidence >= 1.0 {
            return f64::INFINITY;
        }
        ((-confidence).ln_1p() / self.log_miss()).ceil()
    }

    /// Wall-clock milliseconds to reach `confidence` with `workers` running
    /// in parallel, each taking `ms_per_check` per trial.
    pub fn eta_milliseconds(&self, confidence: f64, workers: usize, ms_per_check: f64) -> f64 {
        self.expected_trials(confidence) / workers.max(1) as f64 * ms_per_check
    }

    /// Chance of having found a match after `trials` trials
    pub fn probability_after(&self, trials: u64) -> f64 {
        -(trials as f64 * self.log_miss()).exp_m1()
    }
}

/// Format difficulty as human-readable string
pub fn format_difficulty(difficulty: f64) -> String {
    if !difficulty.is_finite() {
        "∞".to_string()
    } else if difficulty >= 1e15 {
        format!("{:.2e}", difficulty)
    } else if difficulty >= 1e12 {
        format!("{:.2}T", difficulty / 1e12)
    } else if difficulty >= 1e9 {
        format!("{:.2}G", difficulty / 1e9)
    } else if difficulty >= 1e6 {
        format!("{:.2}M", difficulty / 1e6)
    } else if difficulty >= 1e3 {
        format!("{:.2}K", difficulty / 1e3)
    } else {
        format!("{:.0}", difficulty)
    }
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        "forever".to_string()
    } else if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        let mins = seconds / 60.0;
        format!("{:.1}m", mins)
    } else if seconds < 86400.0 {
        let hours = seconds / 3600.0;
        format!("{:.1}h", hours)
    } else if seconds < 86400.0 * 365.0 {
        let days = seconds / 86400.0;
        format!("{:.1}d", days)
    } else {
        let years = seconds / (86400.0 * 365.0);
        format!("{:.1}y", years)
    }
}
