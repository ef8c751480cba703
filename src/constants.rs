//! Wire-format and script constants

/// Default transaction version for newly created transactions
pub const DEFAULT_TX_VERSION: i32 = 1;

/// Default lock time: no lock
pub const DEFAULT_LOCK_TIME: u32 = 0;

/// Sequence number for final transaction
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Maximum number of public keys in a standard multisig redeem script
pub const MAX_MULTISIG_KEYS: usize = 15;

/// Private key / shielded key length in bytes
pub const SECRET_KEY_SIZE: usize = 32;

/// Compressed SEC1 public key length
pub const COMPRESSED_PUBKEY_SIZE: usize = 33;

/// Uncompressed SEC1 public key length
pub const UNCOMPRESSED_PUBKEY_SIZE: usize = 65;

/// Trailing WIF byte marking a compressed public key
pub const WIF_COMPRESSION_MARKER: u8 = 0x01;

/// hash160 output length
pub const HASH160_SIZE: usize = 20;

// Sighash flags
pub const SIGHASH_ALL: u8 = 0x01;
pub const SIGHASH_NONE: u8 = 0x02;
pub const SIGHASH_SINGLE: u8 = 0x03;
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE)
pub const SIGHASH_MASK: u8 = 0x1f;

// Opcodes
pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
/// OP_1 - 1; small integers n in 1..=16 encode as OP_RESERVED + n
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;
