//! Core types for transaction construction and key handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::error::{Result, WalletError};
use crate::network::Network;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Reference to a previous transaction output.
///
/// `txid` is kept in display (RPC) byte order and reversed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, index: u32) -> Self {
        Self { txid, index }
    }

    /// Build an outpoint from a hex txid as printed by explorers and RPC.
    pub fn from_hex(txid: &str, index: u32) -> Result<Self> {
        Ok(Self { txid: decode_hash(txid)?, index })
    }

    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid)
    }
}

/// Transaction input. `script_sig` stays empty until the input is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn unsigned(prevout: OutPoint) -> Self {
        Self {
            prevout,
            script_sig: vec![],
            sequence: SEQUENCE_FINAL,
        }
    }
}

/// Transaction output: value in the smallest unit and its locking script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_pubkey: ByteString,
}

/// Transaction: version, inputs, outputs, lock time.
///
/// Signing mutates inputs in place through `&mut Transaction`, so a single
/// value can never be signed from two threads at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

/// An unspent output being consumed, together with its locking script.
///
/// The locking script is not part of the spending transaction; callers keep
/// it alongside and hand it to the signer for the matching input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub outpoint: OutPoint,
    pub script_pubkey: ByteString,
}

impl Utxo {
    pub fn new(txid: &str, vout: u32, script_pubkey: ByteString) -> Result<Self> {
        Ok(Self {
            outpoint: OutPoint::from_hex(txid, vout)?,
            script_pubkey,
        })
    }
}

/// Requested transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Pay `amount` to a transparent (pubkey-hash or script-hash) address
    Standard { address: Address, amount: u64 },
    /// Provably unspendable output carrying `payload`
    NullData { amount: u64, payload: ByteString },
}

impl Recipient {
    pub fn pay(address: Address, amount: u64) -> Self {
        Recipient::Standard { address, amount }
    }

    /// Null-data output with zero value
    pub fn data(payload: impl Into<ByteString>) -> Self {
        Recipient::NullData {
            amount: 0,
            payload: payload.into(),
        }
    }
}

/// 32-byte secp256k1 secret scalar
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; SECRET_KEY_SIZE]);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; SECRET_KEY_SIZE] = bytes.try_into().map_err(|_| WalletError::KeyLength {
            expected: SECRET_KEY_SIZE.to_string(),
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for PrivateKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| WalletError::Decode(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// SEC1-encoded secp256k1 point: 33 bytes compressed or 65 uncompressed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct PublicKey(#[serde(serialize_with = "hex::serialize")] ByteString);

impl PublicKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        match (bytes.len(), bytes.first()) {
            (COMPRESSED_PUBKEY_SIZE, Some(0x02 | 0x03))
            | (UNCOMPRESSED_PUBKEY_SIZE, Some(0x04)) => Ok(Self(bytes.to_vec())),
            (COMPRESSED_PUBKEY_SIZE | UNCOMPRESSED_PUBKEY_SIZE, _) => Err(WalletError::InvalidKey(
                "unknown public key encoding prefix".to_string(),
            )),
            (len, _) => Err(WalletError::KeyLength {
                expected: format!("{} or {}", COMPRESSED_PUBKEY_SIZE, UNCOMPRESSED_PUBKEY_SIZE),
                actual: len,
            }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_compressed(&self) -> bool {
        self.0.len() == COMPRESSED_PUBKEY_SIZE
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl FromStr for PublicKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| WalletError::Decode(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = WalletError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Base58check address string (transparent or shielded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the checksum and version prefix against `network` and return
    /// the address kind and its 20-byte hash.
    pub fn decode(&self, network: &Network) -> Result<(AddressKind, [u8; HASH160_SIZE])> {
        crate::keys::decode_address(self, network)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.to_string()))
    }
}

/// DER-encoded ECDSA signature followed by its one-byte sighash type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Signature(#[serde(serialize_with = "hex::serialize")] ByteString);

impl Signature {
    pub fn new(der: &[u8], sighash_type: u8) -> Self {
        let mut bytes = Vec::with_capacity(der.len() + 1);
        bytes.extend_from_slice(der);
        bytes.push(sighash_type);
        Self(bytes)
    }

    /// Wrap DER ‖ type bytes. Only the length is checked here; the DER
    /// body is parsed when the signature is verified.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(WalletError::Decode(format!(
                "signature too short: {} bytes",
                bytes.len()
            )));
        }
        Ok(Self(bytes.to_vec()))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| WalletError::Decode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// DER body without the trailing type byte
    pub fn der(&self) -> &[u8] {
        &self.0[..self.0.len() - 1]
    }

    pub fn sighash_type(&self) -> u8 {
        self.0[self.0.len() - 1]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl TryFrom<String> for Signature {
    type Error = WalletError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

/// Transparent address kind, selected by the version prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    PubKeyHash,
    ScriptHash,
}

/// Decode a 64-character hex string into a 32-byte hash
pub fn decode_hash(s: &str) -> Result<Hash> {
    let bytes = hex::decode(s).map_err(|e| WalletError::Decode(e.to_string()))?;
    bytes.as_slice().try_into().map_err(|_| {
        WalletError::Decode(format!("expected 32-byte hash, got {} bytes", bytes.len()))
    })
}
