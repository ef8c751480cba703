//! Shielded (Sprout-style) key chain
//!
//! ```text
//! passphrase ─sha256, top nibble cleared─▶ a_sk (252 bits)
//! a_sk ─PRF_addr(0)──────────────────────▶ a_pk    paying key
//! a_sk ─PRF_addr(1), clamp───────────────▶ sk_enc  ─X25519 base─▶ pk_enc   transmission key
//! base58check(zc_payment_address ‖ a_pk ‖ pk_enc) = shielded address
//! ```
//!
//! `PRF_addr(a_sk, t)` is the raw SHA-256 compression of the 64-byte block
//! `1100 ‖ a_sk ‖ t ‖ 0^248`.

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};

use crate::base58;
use crate::constants::SECRET_KEY_SIZE;
use crate::error::{Result, WalletError};
use crate::hash::{sha256_compress, sha256_hash};
use crate::network::Network;
use crate::types::{Address, Hash};

/// PRF_addr leading tag bits, OR-ed into the first byte of a_sk
const PRF_ADDR_TAG: u8 = 0xc0;
const PRF_ADDR_PAYING: u8 = 0;
const PRF_ADDR_ENCRYPTION: u8 = 1;

fn parse_key32(bytes: &[u8]) -> Result<[u8; SECRET_KEY_SIZE]> {
    bytes.try_into().map_err(|_| WalletError::KeyLength {
        expected: SECRET_KEY_SIZE.to_string(),
        actual: bytes.len(),
    })
}

fn decode_hex32(s: &str) -> Result<[u8; SECRET_KEY_SIZE]> {
    let bytes = hex::decode(s).map_err(|e| WalletError::Decode(e.to_string()))?;
    parse_key32(&bytes)
}

/// 252-bit shielded secret `a_sk`, stored in 32 bytes with the top four
/// bits zero.
#[derive(Clone, PartialEq, Eq)]
pub struct ShieldedSpendingKey([u8; SECRET_KEY_SIZE]);

impl ShieldedSpendingKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key = parse_key32(bytes)?;
        if key[0] & 0xf0 != 0 {
            return Err(WalletError::InvalidKey(
                "shielded spending key must fit in 252 bits".to_string(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ShieldedSpendingKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(&decode_hex32(s)?)
    }
}

impl fmt::Debug for ShieldedSpendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShieldedSpendingKey(..)")
    }
}

/// Paying key `a_pk`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayingKey([u8; 32]);

/// Transmission key `pk_enc`, a Curve25519 public value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransmissionKey([u8; 32]);

macro_rules! public_key32 {
    ($name:ident) => {
        impl $name {
            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl FromStr for $name {
            type Err = WalletError;

            fn from_str(s: &str) -> Result<Self> {
                Ok(Self(decode_hex32(s)?))
            }
        }
    };
}

public_key32!(PayingKey);
public_key32!(TransmissionKey);

fn prf_addr(a_sk: &ShieldedSpendingKey, t: u8) -> Hash {
    let mut block = [0u8; 64];
    block[..32].copy_from_slice(a_sk.as_bytes());
    block[0] |= PRF_ADDR_TAG;
    block[32] = t;
    sha256_compress(&block)
}

/// SHA256 of the passphrase, truncated to 252 bits
pub fn spending_key_from_passphrase(passphrase: &str) -> ShieldedSpendingKey {
    let mut key = sha256_hash(passphrase.as_bytes());
    key[0] &= 0x0f;
    ShieldedSpendingKey(key)
}

pub fn spending_key_to_wif(key: &ShieldedSpendingKey, network: &Network) -> String {
    base58::encode_check(&network.zc_spending_key, key.as_bytes())
}

pub fn spending_key_from_wif(encoded: &str, network: &Network) -> Result<ShieldedSpendingKey> {
    let payload = base58::decode_check_prefixed(encoded, &network.zc_spending_key)?;
    ShieldedSpendingKey::from_slice(&payload)
}

pub fn paying_key_from_spending_key(key: &ShieldedSpendingKey) -> PayingKey {
    PayingKey(prf_addr(key, PRF_ADDR_PAYING))
}

/// Clamped Curve25519 secret `sk_enc` used to decrypt incoming notes
pub fn encryption_key_from_spending_key(key: &ShieldedSpendingKey) -> [u8; 32] {
    let mut sk_enc = prf_addr(key, PRF_ADDR_ENCRYPTION);
    sk_enc[0] &= 248;
    sk_enc[31] &= 127;
    sk_enc[31] |= 64;
    sk_enc
}

pub fn transmission_key_from_spending_key(key: &ShieldedSpendingKey) -> TransmissionKey {
    let sk_enc = encryption_key_from_spending_key(key);
    TransmissionKey(x25519(sk_enc, X25519_BASEPOINT_BYTES))
}

/// base58check(zc_payment_address ‖ a_pk ‖ pk_enc); the keys are not hashed
pub fn address(paying: &PayingKey, transmission: &TransmissionKey, network: &Network) -> Address {
    let mut payload = Vec::with_capacity(64);
    payload.extend_from_slice(paying.as_bytes());
    payload.extend_from_slice(transmission.as_bytes());
    Address::new(base58::encode_check(&network.zc_payment_address, &payload))
}

pub fn address_from_spending_key(key: &ShieldedSpendingKey, network: &Network) -> Address {
    let paying = paying_key_from_spending_key(key);
    let transmission = transmission_key_from_spending_key(key);
    let address = address(&paying, &transmission, network);
    debug!(%address, network = %network.name, "derived shielded address");
    address
}

/// Split a shielded address back into its paying and transmission keys
pub fn decode_address(address: &Address, network: &Network) -> Result<(PayingKey, TransmissionKey)> {
    let payload = base58::decode_check_prefixed(address.as_str(), &network.zc_payment_address)?;
    if payload.len() != 64 {
        return Err(WalletError::Decode(format!(
            "shielded address payload must be 64 bytes, got {}",
            payload.len()
        )));
    }
    Ok((
        PayingKey(parse_key32(&payload[..32])?),
        TransmissionKey(parse_key32(&payload[32..])?),
    ))
}

/// Viewing key: base58check(zc_viewing_key ‖ a_pk ‖ sk_enc)
pub fn viewing_key(key: &ShieldedSpendingKey, network: &Network) -> String {
    let mut payload = Vec::with_capacity(64);
    payload.extend_from_slice(paying_key_from_spending_key(key).as_bytes());
    payload.extend_from_slice(&encryption_key_from_spending_key(key));
    base58::encode_check(&network.zc_viewing_key, &payload)
}
