//! Nano wallet seeds

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Seed length in bytes
pub const SEED_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeedError {
    #[error("Seed must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Seed is not valid hex: {0}")]
    InvalidHex(String),
}

/// A 32-byte Nano seed.
///
/// `Debug` never prints the secret bytes; use `to_hex` or `Display` when the
/// seed is meant to be shown.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Sample a seed uniformly from the whole seed space using the OS CSPRNG.
    ///
    /// Every byte value is a legal seed byte, so bytes are taken straight
    /// from the generator with no rejection or modulo step.
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Uppercase hex, the form Nano wallets import
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != SEED_LEN * 2 {
            return Err(SeedError::InvalidLength {
                expected: SEED_LEN * 2,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; SEED_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| SeedError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
