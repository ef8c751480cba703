//! Base58check encoding: base58(prefix ‖ payload ‖ sha256d(prefix ‖ payload)[..4])

use crate::error::{Result, WalletError};

/// Base58check-encode `payload` behind a version prefix
pub fn encode_check(prefix: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(prefix.len() + payload.len());
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

/// Decode and verify the checksum, returning prefix ‖ payload
pub fn decode_check(encoded: &str) -> Result<Vec<u8>> {
    bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| WalletError::Decode(e.to_string()))
}

/// Decode, verify the checksum and strip an expected version prefix
pub fn decode_check_prefixed(encoded: &str, prefix: &[u8]) -> Result<Vec<u8>> {
    let data = decode_check(encoded)?;
    match data.strip_prefix(prefix) {
        Some(payload) => Ok(payload.to_vec()),
        None => Err(WalletError::Decode(format!(
            "version prefix mismatch: expected {}, got {}",
            hex::encode(prefix),
            hex::encode(&data[..prefix.len().min(data.len())])
        ))),
    }
}
