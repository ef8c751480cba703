//! Transaction construction and wire (de)serialization
//!
//! Wire layout:
//! version(4 LE) ‖ varint(#in) ‖ inputs ‖ varint(#out) ‖ outputs ‖ lock_time(4 LE)
//!
//! input  = txid(32, reversed) ‖ vout(4 LE) ‖ varint(len) ‖ script_sig ‖ sequence(4 LE)
//! output = value(8 LE) ‖ varint(len) ‖ script_pubkey

use tracing::{debug, trace};

use crate::codec::{encode_varint, write_var_bytes, ByteReader};
use crate::constants::*;
use crate::error::{Result, WalletError};
use crate::hash::sha256d_hash;
use crate::network::Network;
use crate::script::{null_data_script, script_for_address};
use crate::types::*;

/// Build an unsigned transaction spending `utxos` to `recipients`.
///
/// Version 1, lock time 0, every sequence `0xffffffff`, every `script_sig`
/// empty. The UTXO locking scripts are not copied into the transaction; pass
/// them to the signer.
pub fn create_raw_transaction(
    utxos: &[Utxo],
    recipients: &[Recipient],
    network: &Network,
) -> Result<Transaction> {
    let inputs = utxos
        .iter()
        .map(|utxo| TransactionInput::unsigned(utxo.outpoint.clone()))
        .collect();

    let outputs = recipients
        .iter()
        .map(|recipient| match recipient {
            Recipient::Standard { address, amount } => Ok(TransactionOutput {
                value: *amount,
                script_pubkey: script_for_address(address, network)?,
            }),
            Recipient::NullData { amount, payload } => Ok(TransactionOutput {
                value: *amount,
                script_pubkey: null_data_script(payload),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    let tx = Transaction {
        version: DEFAULT_TX_VERSION,
        inputs,
        outputs,
        lock_time: DEFAULT_LOCK_TIME,
    };
    debug!(
        inputs = tx.inputs.len(),
        outputs = tx.outputs.len(),
        network = %network.name,
        "created raw transaction"
    );
    Ok(tx)
}

/// Serialize to wire bytes
pub fn serialize(tx: &Transaction) -> ByteString {
    let mut data = Vec::new();

    data.extend_from_slice(&tx.version.to_le_bytes());

    data.extend_from_slice(&encode_varint(tx.inputs.len() as u64));
    for input in &tx.inputs {
        let mut txid = input.prevout.txid;
        txid.reverse();
        data.extend_from_slice(&txid);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_var_bytes(&mut data, &input.script_sig);
        data.extend_from_slice(&input.sequence.to_le_bytes());
    }

    data.extend_from_slice(&encode_varint(tx.outputs.len() as u64));
    for output in &tx.outputs {
        data.extend_from_slice(&output.value.to_le_bytes());
        write_var_bytes(&mut data, &output.script_pubkey);
    }

    data.extend_from_slice(&tx.lock_time.to_le_bytes());
    data
}

/// Parse wire bytes. Trailing bytes after the lock time are rejected.
pub fn deserialize(bytes: &[u8]) -> Result<Transaction> {
    let mut reader = ByteReader::new(bytes);

    let version = reader.read_i32_le()?;

    let input_count = read_count(&mut reader, 41)?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let mut txid: Hash = reader.read_array()?;
        txid.reverse();
        let index = reader.read_u32_le()?;
        let script_sig = reader.read_var_bytes()?;
        let sequence = reader.read_u32_le()?;
        inputs.push(TransactionInput {
            prevout: OutPoint { txid, index },
            script_sig,
            sequence,
        });
    }

    let output_count = read_count(&mut reader, 9)?;
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let value = reader.read_u64_le()?;
        let script_pubkey = reader.read_var_bytes()?;
        outputs.push(TransactionOutput { value, script_pubkey });
    }

    let lock_time = reader.read_u32_le()?;

    if reader.remaining() != 0 {
        return Err(WalletError::MalformedTransaction(format!(
            "{} trailing bytes after lock time at offset {}",
            reader.remaining(),
            reader.position()
        )));
    }

    trace!(bytes = bytes.len(), inputs = inputs.len(), outputs = outputs.len(), "deserialized transaction");
    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// Read an element count, rejecting counts that could not possibly fit in
/// the remaining bytes given each element's minimum encoded size.
fn read_count(reader: &mut ByteReader<'_>, min_element_size: usize) -> Result<usize> {
    let count = reader.read_varint()?;
    if count > (reader.remaining() / min_element_size) as u64 {
        return Err(WalletError::MalformedTransaction(format!(
            "declared count {} exceeds remaining {} bytes",
            count,
            reader.remaining()
        )));
    }
    Ok(count as usize)
}

impl Transaction {
    pub fn serialize(&self) -> ByteString {
        serialize(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        deserialize(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| WalletError::MalformedTransaction(e.to_string()))?;
        deserialize(&bytes)
    }

    /// Transaction id: double SHA256 of the wire bytes, in display order
    pub fn txid(&self) -> Hash {
        let mut hash = sha256d_hash(&self.serialize());
        hash.reverse();
        hash
    }

    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid())
    }
}
