//! Chain trait and types

use serde::{Deserialize, Serialize};

use nanovanity_crypto::Seed;

/// A derived account with its keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAccount {
    /// The address string
    pub address: String,
    /// Account private key in hex format
    pub private_key_hex: String,
    /// Public key in hex format
    pub public_key_hex: String,
    /// Chain ticker
    pub chain: String,
}

/// Seed-to-address derivation for one address format.
///
/// Implementations must be deterministic: the same seed always yields the
/// same address.
pub trait Chain: Send + Sync {
    /// Chain ticker symbol (e.g., "XNO")
    fn ticker(&self) -> &'static str;

    /// Full chain name
    fn name(&self) -> &'static str;

    /// Derive the address of the seed's first account
    fn derive(&self, seed: &Seed) -> String;

    /// Derive the first account with its keys
    fn derive_account(&self, seed: &Seed) -> DerivedAccount;

    /// Characters that can appear in an address body (for pattern validation)
    fn valid_address_chars(&self) -> &'static str;

    /// The network prefix (e.g., "nano_")
    fn address_prefix(&self) -> &'static str;

    /// Length of the fixed header that prefix searches skip
    fn header_len(&self) -> usize;
}
