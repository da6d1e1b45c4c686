//! NanoVanity Crypto Primitives
//! 
//! Low-level cryptographic operations for Nano seed and address generation.

pub mod seed;
pub mod ed25519;
pub mod hash;
pub mod encoding;

pub use self::seed::{Seed, SeedError, SEED_LEN};
pub use self::ed25519::Ed25519Blake2bKeypair;

// Re-export dependencies for use by other crates
pub use hex;
