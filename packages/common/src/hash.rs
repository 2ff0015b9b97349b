//! Keccak-256 shared by the bridge and the relay endpoint.
//!
//! Both sides of a stored payload must agree on the hash, so there is one
//! implementation for all contracts in the workspace.

use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}
