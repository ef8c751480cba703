//! Signature hashing and ECDSA signing of transaction inputs
//!
//! The legacy (pre-segwit) algorithm: copy the transaction, blank every
//! `script_sig`, put the spent output's script code into the input being
//! signed, apply the sighash-type edits, serialize, append the 4-byte type
//! and double-SHA256 the result.
//!
//! Nonces are derived per RFC 6979, so signing the same digest with the same
//! key always yields the same signature.

use secp256k1::{ecdsa, Message, Secp256k1, SecretKey};
use tracing::{debug, trace};

use crate::constants::*;
use crate::error::{Result, WalletError};
use crate::hash::sha256d_hash;
use crate::keys::public_key_from_private_key;
use crate::script::{p2pkh_unlocking_script, RedeemScript};
use crate::transaction::serialize;
use crate::types::*;

/// Sighash flags: a base type (ALL, NONE, SINGLE) optionally combined with
/// ANYONECANPAY.
///
/// Held as the single byte appended to signatures; the preimage commits to
/// the same value widened to four bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SighashType(u8);

impl SighashType {
    pub const ALL: Self = Self(SIGHASH_ALL);
    pub const NONE: Self = Self(SIGHASH_NONE);
    pub const SINGLE: Self = Self(SIGHASH_SINGLE);

    pub fn from_byte(value: u8) -> Self {
        Self(value)
    }

    /// Values above 0xff cannot be carried in a signature's type byte
    pub fn from_u32(value: u32) -> Result<Self> {
        u8::try_from(value).map(Self).map_err(|_| {
            WalletError::Decode(format!("sighash type {:#x} does not fit in one byte", value))
        })
    }

    pub fn with_anyone_can_pay(self) -> Self {
        Self(self.0 | SIGHASH_ANYONECANPAY)
    }

    pub fn to_u32(self) -> u32 {
        u32::from(self.0)
    }

    /// Byte appended to DER signatures
    pub fn to_byte(self) -> u8 {
        self.0
    }

    pub fn base(self) -> u8 {
        self.0 & SIGHASH_MASK
    }

    pub fn anyone_can_pay(self) -> bool {
        self.0 & SIGHASH_ANYONECANPAY != 0
    }
}

impl Default for SighashType {
    fn default() -> Self {
        Self::ALL
    }
}

/// Digest signed for SIGHASH_SINGLE when the input has no matching output
const SIGHASH_SINGLE_OUT_OF_RANGE: Hash = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

fn check_index(tx: &Transaction, index: usize) -> Result<()> {
    if index >= tx.inputs.len() {
        return Err(WalletError::InputIndex {
            index,
            inputs: tx.inputs.len(),
        });
    }
    Ok(())
}

/// The transaction copy committed to by a signature over input `index`.
///
/// Returns `None` for SIGHASH_SINGLE without a matching output, where the
/// fixed out-of-range digest is signed instead.
pub fn signature_form(
    tx: &Transaction,
    index: usize,
    script_code: &[u8],
    sighash: SighashType,
) -> Result<Option<Transaction>> {
    check_index(tx, index)?;

    let mut form = tx.clone();
    for input in &mut form.inputs {
        input.script_sig.clear();
    }
    form.inputs[index].script_sig = script_code.to_vec();

    match sighash.base() {
        SIGHASH_NONE => {
            form.outputs.clear();
            zero_other_sequences(&mut form, index);
        }
        SIGHASH_SINGLE => {
            if index >= form.outputs.len() {
                return Ok(None);
            }
            form.outputs.truncate(index + 1);
            for output in &mut form.outputs[..index] {
                output.value = u64::MAX;
                output.script_pubkey.clear();
            }
            zero_other_sequences(&mut form, index);
        }
        _ => {}
    }

    if sighash.anyone_can_pay() {
        let input = form.inputs.swap_remove(index);
        form.inputs = vec![input];
    }

    Ok(Some(form))
}

fn zero_other_sequences(form: &mut Transaction, index: usize) {
    for (i, input) in form.inputs.iter_mut().enumerate() {
        if i != index {
            input.sequence = 0;
        }
    }
}

/// Signature hash for input `index` spending an output locked by
/// `script_code` (the previous `script_pubkey`, or the redeem script for
/// script-hash spends).
pub fn compute_signature_hash(
    tx: &Transaction,
    index: usize,
    script_code: &[u8],
    sighash: SighashType,
) -> Result<Hash> {
    let form = match signature_form(tx, index, script_code, sighash)? {
        Some(form) => form,
        None => return Ok(SIGHASH_SINGLE_OUT_OF_RANGE),
    };

    let mut preimage = serialize(&form);
    preimage.extend_from_slice(&sighash.to_u32().to_le_bytes());
    let digest = sha256d_hash(&preimage);
    trace!(index, sighash = sighash.to_u32(), digest = %hex::encode(digest), "computed signature hash");
    Ok(digest)
}

/// ECDSA-sign a 32-byte digest, returning DER ‖ sighash byte
pub fn sign_digest(digest: &Hash, key: &PrivateKey, sighash: SighashType) -> Result<Signature> {
    let secp = Secp256k1::signing_only();
    let secret = SecretKey::from_slice(key.as_bytes())?;
    let message = Message::from_digest_slice(digest)?;
    let signature = secp.sign_ecdsa(&message, &secret);
    Ok(Signature::new(&signature.serialize_der(), sighash.to_byte()))
}

/// Sign a pay-to-pubkey-hash input and install `<sig> <pubkey>` as its
/// `script_sig`. Returns the unlocking script.
pub fn sign_input(
    tx: &mut Transaction,
    index: usize,
    prev_script_pubkey: &[u8],
    key: &PrivateKey,
    compressed: bool,
    sighash: SighashType,
) -> Result<ByteString> {
    let digest = compute_signature_hash(tx, index, prev_script_pubkey, sighash)?;
    let signature = sign_digest(&digest, key, sighash)?;
    let pubkey = public_key_from_private_key(key, compressed)?;

    let script_sig = p2pkh_unlocking_script(signature.as_bytes(), &pubkey);
    tx.inputs[index].script_sig = script_sig.clone();
    debug!(index, sighash = sighash.to_u32(), compressed, "signed input");
    Ok(script_sig)
}

/// One participant's signature over a multisig input. The redeem script is
/// the script code; the transaction is left untouched.
pub fn multi_sign(
    tx: &Transaction,
    index: usize,
    key: &PrivateKey,
    redeem_script: &RedeemScript,
    sighash: SighashType,
) -> Result<Signature> {
    let digest = compute_signature_hash(tx, index, &redeem_script.to_bytes(), sighash)?;
    let signature = sign_digest(&digest, key, sighash)?;
    debug!(index, sighash = sighash.to_u32(), "produced multisig signature");
    Ok(signature)
}

/// Check a DER ‖ type signature against a digest and public key.
/// High-S signatures are normalized before verification.
pub fn verify_signature(digest: &Hash, signature: &Signature, pubkey: &PublicKey) -> bool {
    let secp = Secp256k1::verification_only();
    let pubkey = match secp256k1::PublicKey::from_slice(pubkey.as_bytes()) {
        Ok(pk) => pk,
        Err(_) => return false,
    };
    let mut sig = match ecdsa::Signature::from_der(signature.der()) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    sig.normalize_s();
    let message = match Message::from_digest_slice(digest) {
        Ok(msg) => msg,
        Err(_) => return false,
    };
    secp.verify_ecdsa(&message, &sig, &pubkey).is_ok()
}

/// Verify `signature` over input `index`, using the sighash type carried in
/// the signature's last byte.
pub fn verify_input(
    tx: &Transaction,
    index: usize,
    script_code: &[u8],
    signature: &Signature,
    pubkey: &PublicKey,
) -> Result<bool> {
    let sighash = SighashType::from_byte(signature.sighash_type());
    let digest = compute_signature_hash(tx, index, script_code, sighash)?;
    Ok(verify_signature(&digest, signature, pubkey))
}
