//! Multisig unlocking-script assembly
//!
//! `OP_0 <sig_1> ... <sig_k> <redeem script>`, each element pushed with its
//! shortest push prefix. `OP_CHECKMULTISIG` walks keys and signatures in
//! lockstep, so signatures must appear in the same relative order as their
//! keys in the redeem script.

use tracing::debug;

use crate::codec::push_data;
use crate::constants::*;
use crate::error::{Result, WalletError};
use crate::script::RedeemScript;
use crate::sighash::verify_input;
use crate::types::*;

/// Install the multisig unlocking script on input `index` and return it.
///
/// Signatures are used in the order given; see [`order_signatures`] to sort
/// them by key first. Only assembly is checked here: the input is spendable
/// once exactly `m` valid, correctly ordered signatures are present.
pub fn apply_multi_signatures(
    tx: &mut Transaction,
    index: usize,
    signatures: &[Signature],
    redeem_script: &RedeemScript,
) -> Result<ByteString> {
    if index >= tx.inputs.len() {
        return Err(WalletError::InputIndex {
            index,
            inputs: tx.inputs.len(),
        });
    }
    let m = redeem_script.threshold();
    if signatures.is_empty() || signatures.len() > m {
        return Err(WalletError::SignatureCount {
            got: signatures.len(),
            max: m,
        });
    }

    let mut script_sig = vec![OP_0];
    for signature in signatures {
        push_data(&mut script_sig, signature.as_bytes());
    }
    push_data(&mut script_sig, &redeem_script.to_bytes());

    tx.inputs[index].script_sig = script_sig.clone();
    debug!(index, signatures = signatures.len(), threshold = m, "applied multisig signatures");
    Ok(script_sig)
}

/// Sort signatures into redeem-script key order by trial verification.
///
/// Each signature is matched against the first remaining key it verifies
/// for. A signature that matches no remaining key is an error.
pub fn order_signatures(
    tx: &Transaction,
    index: usize,
    signatures: &[Signature],
    redeem_script: &RedeemScript,
) -> Result<Vec<Signature>> {
    let script_code = redeem_script.to_bytes();
    let mut matched: Vec<(usize, &Signature)> = Vec::with_capacity(signatures.len());

    for (sig_pos, signature) in signatures.iter().enumerate() {
        let mut found = None;
        for (key_pos, pubkey) in redeem_script.pubkeys().iter().enumerate() {
            if matched.iter().any(|(used, _)| *used == key_pos) {
                continue;
            }
            if verify_input(tx, index, &script_code, signature, pubkey)? {
                found = Some(key_pos);
                break;
            }
        }
        match found {
            Some(key_pos) => matched.push((key_pos, signature)),
            None => return Err(WalletError::UnmatchedSignature(sig_pos)),
        }
    }

    matched.sort_by_key(|(key_pos, _)| *key_pos);
    Ok(matched.into_iter().map(|(_, sig)| sig.clone()).collect())
}
