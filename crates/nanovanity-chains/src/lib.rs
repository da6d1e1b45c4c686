//! NanoVanity Chain Adapters
//!
//! The seed-to-address derivation primitive behind a trait, so the search
//! engine never depends on a concrete address format.

pub mod traits;
pub mod nano;

// Re-exports
pub use traits::{Chain, DerivedAccount};
pub use nano::{NanoChain, NANO, XRB};
