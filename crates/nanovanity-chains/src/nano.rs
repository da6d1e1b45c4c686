//! Nano chain adapter
//!
//! Nano: Ed25519-Blake2b pubkey, base32 encoded, plus a Blake2b-40 checksum

use crate::traits::{Chain, DerivedAccount};
use nanovanity_crypto::{
    encoding::{nano_base32_encode, NANO_ALPHABET},
    hash::blake2b_40,
    hex, Ed25519Blake2bKeypair, Seed,
};

/// Nano address format with a configurable network prefix
#[derive(Debug, Clone, Copy)]
pub struct NanoChain {
    ticker: &'static str,
    name: &'static str,
    prefix: &'static str,
}

impl NanoChain {
    pub const fn new(ticker: &'static str, name: &'static str, prefix: &'static str) -> Self {
        Self { ticker, name, prefix }
    }

    fn address_for(&self, keypair: &Ed25519Blake2bKeypair) -> String {
        let public_key = keypair.public_key_bytes();

        let mut checksum = blake2b_40(&public_key);
        checksum.reverse();

        // 4 pad bits + 256 key bits = 52 chars; 40 checksum bits = 8 chars
        let mut address = String::with_capacity(self.prefix.len() + 60);
        address.push_str(self.prefix);
        address.push_str(&nano_base32_encode(&public_key, 4));
        address.push_str(&nano_base32_encode(&checksum, 0));
        address
    }
}

/// Current `nano_` addresses
pub const NANO: NanoChain = NanoChain::new("XNO", "Nano", "nano_");
/// Legacy `xrb_` addresses (same keys, older prefix)
pub const XRB: NanoChain = NanoChain::new("XRB", "Nano (legacy xrb_)", "xrb_");

impl Chain for NanoChain {
    fn ticker(&self) -> &'static str {
        self.ticker
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn derive(&self, seed: &Seed) -> String {
        self.address_for(&Ed25519Blake2bKeypair::from_seed(seed, 0))
    }

    fn derive_account(&self, seed: &Seed) -> DerivedAccount {
        let keypair = Ed25519Blake2bKeypair::from_seed(seed, 0);
        DerivedAccount {
            address: self.address_for(&keypair),
            private_key_hex: hex::encode_upper(keypair.private_key_bytes()),
            public_key_hex: hex::encode_upper(keypair.public_key_bytes()),
            chain: self.ticker.to_string(),
        }
    }

    fn valid_address_chars(&self) -> &'static str {
        NANO_ALPHABET
    }

    fn address_prefix(&self) -> &'static str {
        self.prefix
    }

    // The prefix plus the first body character, which is always 1 or 3
    fn header_len(&self) -> usize {
        self.prefix.len() + 1
    }
}
