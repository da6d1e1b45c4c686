//! Hash functions for address derivation

use blake2::digest::consts::{U32, U5};
use blake2::{Blake2b, Blake2b512, Digest};

type Blake2b256 = Blake2b<U32>;
type Blake2b40 = Blake2b<U5>;

/// Blake2b with a 32-byte digest over the concatenation of `parts`
pub fn blake2b_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Blake2b with a 64-byte digest (the Ed25519 hash in Nano)
pub fn blake2b_512(data: &[u8]) -> [u8; 64] {
    let digest = Blake2b512::digest(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

/// Blake2b with a 5-byte digest (Nano address checksum)
pub fn blake2b_40(data: &[u8]) -> [u8; 5] {
    let mut hasher = Blake2b40::new();
    hasher.update(data);
    hasher.finalize().into()
}
