//! Transparent key and address derivation
//!
//! passphrase → private key → public key → hash160 → base58check address.
//! Every encoding step takes the [`Network`] whose prefixes it should use.

use secp256k1::{Secp256k1, SecretKey};
use tracing::debug;

use crate::base58;
use crate::constants::*;
use crate::error::{Result, WalletError};
use crate::hash::{hash160, sha256_hash};
use crate::network::Network;
use crate::script::RedeemScript;
use crate::types::*;

/// SHA256 of the UTF-8 passphrase. Unsalted: the same passphrase always
/// yields the same key.
pub fn private_key_from_passphrase(passphrase: &str) -> PrivateKey {
    PrivateKey::from_bytes(sha256_hash(passphrase.as_bytes()))
}

/// WIF: base58check(wif prefix ‖ key ‖ [0x01 if compressed])
pub fn to_wif(key: &PrivateKey, compressed: bool, network: &Network) -> String {
    let mut payload = key.as_bytes().to_vec();
    if compressed {
        payload.push(WIF_COMPRESSION_MARKER);
    }
    base58::encode_check(&network.wif, &payload)
}

/// Decode a WIF string, returning the key and whether it was marked
/// compressed.
pub fn decode_wif(wif: &str, network: &Network) -> Result<(PrivateKey, bool)> {
    let payload = base58::decode_check_prefixed(wif, &network.wif)?;
    match payload.len() {
        SECRET_KEY_SIZE => Ok((PrivateKey::from_slice(&payload)?, false)),
        33 if payload[SECRET_KEY_SIZE] == WIF_COMPRESSION_MARKER => {
            Ok((PrivateKey::from_slice(&payload[..SECRET_KEY_SIZE])?, true))
        }
        33 => Err(WalletError::Decode(format!(
            "unexpected WIF suffix byte 0x{:02x}",
            payload[SECRET_KEY_SIZE]
        ))),
        len => Err(WalletError::KeyLength {
            expected: format!("{} or {}", SECRET_KEY_SIZE, SECRET_KEY_SIZE + 1),
            actual: len,
        }),
    }
}

/// Decode a WIF string, dropping the compression marker if present
pub fn from_wif(wif: &str, network: &Network) -> Result<PrivateKey> {
    decode_wif(wif, network).map(|(key, _)| key)
}

pub fn public_key_from_private_key(key: &PrivateKey, compressed: bool) -> Result<PublicKey> {
    let secp = Secp256k1::signing_only();
    let secret = SecretKey::from_slice(key.as_bytes())?;
    let point = secp256k1::PublicKey::from_secret_key(&secp, &secret);
    if compressed {
        PublicKey::from_slice(&point.serialize())
    } else {
        PublicKey::from_slice(&point.serialize_uncompressed())
    }
}

/// Pay-to-pubkey-hash address: base58check(pubkey_hash prefix ‖ hash160(pubkey))
pub fn address_from_public_key(pubkey: &PublicKey, network: &Network) -> Address {
    Address::new(base58::encode_check(
        &network.pubkey_hash,
        &hash160(pubkey.as_bytes()),
    ))
}

/// Build an M-of-N redeem script, keeping the caller's key order
pub fn multisig_redeem_script(pubkeys: &[PublicKey], m: usize, n: usize) -> Result<RedeemScript> {
    RedeemScript::multisig(pubkeys.to_vec(), m, n)
}

/// Script-hash address: base58check(script_hash prefix ‖ hash160(script))
pub fn address_from_redeem_script(script: &RedeemScript, network: &Network) -> Address {
    let address = Address::new(base58::encode_check(
        &network.script_hash,
        &hash160(&script.to_bytes()),
    ));
    debug!(%address, m = script.threshold(), n = script.pubkeys().len(), "derived script-hash address");
    address
}

/// Validate a transparent address against the network table and return its
/// kind and 20-byte hash.
pub fn decode_address(address: &Address, network: &Network) -> Result<(AddressKind, [u8; HASH160_SIZE])> {
    let data = base58::decode_check(address.as_str())?;
    let (kind, hash) = if let Some(hash) = data.strip_prefix(network.pubkey_hash.as_slice()) {
        (AddressKind::PubKeyHash, hash)
    } else if let Some(hash) = data.strip_prefix(network.script_hash.as_slice()) {
        (AddressKind::ScriptHash, hash)
    } else {
        return Err(WalletError::Decode(format!(
            "address {} does not belong to {}",
            address, network.name
        )));
    };
    let hash: [u8; HASH160_SIZE] = hash.try_into().map_err(|_| {
        WalletError::Decode(format!("address hash must be 20 bytes, got {}", hash.len()))
    })?;
    Ok((kind, hash))
}
