//! Ed25519 with Blake2b-512 as the hash, the signature scheme Nano uses

use curve25519_dalek::edwards::EdwardsPoint;

use crate::hash::{blake2b_256, blake2b_512};
use crate::seed::Seed;

/// A Nano account keypair
#[derive(Clone)]
pub struct Ed25519Blake2bKeypair {
    private_key: [u8; 32],
    public_key: [u8; 32],
}

impl Ed25519Blake2bKeypair {
    /// Derive the account at `index` from a wallet seed.
    ///
    /// private key = Blake2b-256(seed || index as big-endian u32)
    pub fn from_seed(seed: &Seed, index: u32) -> Self {
        let private_key = blake2b_256(&[seed.as_bytes(), &index.to_be_bytes()]);
        Self::from_private_key(private_key)
    }

    /// Compute the public key for a raw private key
    pub fn from_private_key(private_key: [u8; 32]) -> Self {
        let expanded = blake2b_512(&private_key);
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(&expanded[..32]);
        let public_key = EdwardsPoint::mul_base_clamped(scalar).compress().to_bytes();
        Self {
            private_key,
            public_key,
        }
    }

    /// Get the private key as bytes (32 bytes)
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.private_key
    }

    /// Get the public key as bytes (32 bytes)
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.public_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_index_zero() {
        let kp = Ed25519Blake2bKeypair::from_seed(&Seed::from_bytes([0u8; 32]), 0);
        assert_eq!(
            hex::encode_upper(kp.private_key_bytes()),
            "9F0E444C69F77A49BD0BE89DB92C38FE713E0963165CCA12FAF5712D7657120F"
        );
        assert_eq!(
            hex::encode_upper(kp.public_key_bytes()),
            "C008B814A7D269A1FA3C6528B19201A24D797912DB9996FF02A1FF356E45552B"
        );
    }

    #[test]
    fn test_deterministic() {
        let seed = Seed::from_bytes([1u8; 32]);
        let kp1 = Ed25519Blake2bKeypair::from_seed(&seed, 0);
        let kp2 = Ed25519Blake2bKeypair::from_seed(&seed, 0);
        assert_eq!(kp1.public_key_bytes(), kp2.public_key_bytes());
    }

    #[test]
    fn test_index_changes_account() {
        let seed = Seed::from_bytes([1u8; 32]);
        let first = Ed25519Blake2bKeypair::from_seed(&seed, 0);
        let second = Ed25519Blake2bKeypair::from_seed(&seed, 1);
        assert_ne!(first.private_key_bytes(), second.private_key_bytes());
        assert_ne!(first.public_key_bytes(), second.public_key_bytes());
    }
}
