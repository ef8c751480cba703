//! Hash primitives

use bitcoin_hashes::{sha256, sha256d, Hash as BitcoinHash, HashEngine};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::types::Hash;

/// SHA256(x)
pub fn sha256_hash(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// SHA256(SHA256(x))
pub fn sha256d_hash(data: &[u8]) -> Hash {
    sha256d::Hash::hash(data).into_inner()
}

/// RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha256_hash = Sha256::digest(data);
    let ripemd160_hash = Ripemd160::digest(sha256_hash);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripemd160_hash);
    out
}

/// The bare SHA-256 compression function applied to a single 64-byte block
/// from the standard IV: no padding, no length suffix. Output is the eight
/// state words in big-endian order.
pub fn sha256_compress(block: &[u8; 64]) -> Hash {
    let mut engine = sha256::Hash::engine();
    engine.input(block);
    engine.midstate().into_inner()
}
