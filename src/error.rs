//! Error types for key derivation, transaction assembly and signing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Invalid multisig threshold: {m}-of-{n} with {keys} keys")]
    InvalidThreshold { m: usize, n: usize, keys: usize },

    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("Expected between 1 and {max} signatures, got {got}")]
    SignatureCount { got: usize, max: usize },

    #[error("Invalid key length: expected {expected}, got {actual}")]
    KeyLength { expected: String, actual: usize },

    #[error("Input index {index} out of range (transaction has {inputs} inputs)")]
    InputIndex { index: usize, inputs: usize },

    #[error("Signature {0} does not match any remaining key in the redeem script")]
    UnmatchedSignature(usize),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid network configuration: {0}")]
    Config(String),
}

impl From<secp256k1::Error> for WalletError {
    fn from(err: secp256k1::Error) -> Self {
        WalletError::InvalidKey(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
