//! Locking, unlocking and redeem script construction
//!
//! Every builder has exactly one output encoding: data is always pushed with
//! the shortest push form and small integers with `OP_1..OP_16`.

use serde::{Deserialize, Serialize};

use crate::codec::{push_data, ByteReader};
use crate::constants::*;
use crate::error::{Result, WalletError};
use crate::keys::decode_address;
use crate::network::Network;
use crate::types::*;

/// Append-only opcode byte builder
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    code: ByteString,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.code.push(opcode);
        self
    }

    pub fn push_slice(mut self, data: &[u8]) -> Self {
        push_data(&mut self.code, data);
        self
    }

    pub fn push_small_int(self, n: SmallInt) -> Self {
        self.push_opcode(n.opcode())
    }

    pub fn into_bytes(self) -> ByteString {
        self.code
    }
}

/// Integer in 1..=16, encoded as the single opcode `OP_1..OP_16`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SmallInt(u8);

impl SmallInt {
    pub fn new(n: usize) -> Option<Self> {
        (1..=16).contains(&n).then(|| Self(n as u8))
    }

    pub fn from_opcode(opcode: u8) -> Option<Self> {
        (OP_1..=OP_16)
            .contains(&opcode)
            .then(|| Self(opcode - OP_RESERVED))
    }

    pub fn opcode(self) -> u8 {
        OP_RESERVED + self.0
    }

    pub fn value(self) -> usize {
        self.0 as usize
    }
}

/// OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG
pub fn p2pkh_script(pubkey_hash: &[u8; HASH160_SIZE]) -> ByteString {
    ScriptBuilder::new()
        .push_opcode(OP_DUP)
        .push_opcode(OP_HASH160)
        .push_slice(pubkey_hash)
        .push_opcode(OP_EQUALVERIFY)
        .push_opcode(OP_CHECKSIG)
        .into_bytes()
}

/// OP_HASH160 <hash> OP_EQUAL
pub fn p2sh_script(script_hash: &[u8; HASH160_SIZE]) -> ByteString {
    ScriptBuilder::new()
        .push_opcode(OP_HASH160)
        .push_slice(script_hash)
        .push_opcode(OP_EQUAL)
        .into_bytes()
}

/// OP_RETURN <payload>
pub fn null_data_script(payload: &[u8]) -> ByteString {
    ScriptBuilder::new()
        .push_opcode(OP_RETURN)
        .push_slice(payload)
        .into_bytes()
}

/// Locking script paying to a transparent address, chosen by its prefix
pub fn script_for_address(address: &Address, network: &Network) -> Result<ByteString> {
    let (kind, hash) = decode_address(address, network)?;
    Ok(match kind {
        AddressKind::PubKeyHash => p2pkh_script(&hash),
        AddressKind::ScriptHash => p2sh_script(&hash),
    })
}

/// <sig+type> <pubkey>
pub fn p2pkh_unlocking_script(signature: &[u8], pubkey: &PublicKey) -> ByteString {
    ScriptBuilder::new()
        .push_slice(signature)
        .push_slice(pubkey.as_bytes())
        .into_bytes()
}

/// M-of-N multisig redeem script.
///
/// Keys are kept in the order they were supplied; signatures must later be
/// applied in this same order. Serialized as the script hex, so every
/// deserialized value has passed the same checks as [`RedeemScript::multisig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedeemScript {
    pubkeys: Vec<PublicKey>,
    m: SmallInt,
    n: SmallInt,
}

impl RedeemScript {
    /// Requires `1 <= m <= n == pubkeys.len() <= 15`
    pub fn multisig(pubkeys: Vec<PublicKey>, m: usize, n: usize) -> Result<Self> {
        let invalid = || WalletError::InvalidThreshold {
            m,
            n,
            keys: pubkeys.len(),
        };
        if m > n || n != pubkeys.len() || n > MAX_MULTISIG_KEYS {
            return Err(invalid());
        }
        let m = SmallInt::new(m).ok_or_else(invalid)?;
        let n = SmallInt::new(n).ok_or_else(invalid)?;
        Ok(Self { pubkeys, m, n })
    }

    /// Parse `OP_M <pubkey>... OP_N OP_CHECKMULTISIG`
    pub fn from_bytes(script: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(script);
        let decode_err = |msg: &str| WalletError::Decode(format!("redeem script: {}", msg));

        let m = SmallInt::from_opcode(reader.read_u8().map_err(|_| decode_err("empty script"))?)
            .ok_or_else(|| decode_err("missing OP_M"))?;

        let mut pubkeys = Vec::new();
        let n = loop {
            let op = reader.read_u8().map_err(|_| decode_err("truncated"))?;
            match op as usize {
                COMPRESSED_PUBKEY_SIZE | UNCOMPRESSED_PUBKEY_SIZE => {
                    let key = reader
                        .read_bytes(op as usize)
                        .map_err(|_| decode_err("truncated public key"))?;
                    pubkeys.push(PublicKey::from_slice(key)?);
                }
                _ => break SmallInt::from_opcode(op).ok_or_else(|| decode_err("missing OP_N"))?,
            }
        };

        if reader.read_u8().ok() != Some(OP_CHECKMULTISIG) || reader.remaining() != 0 {
            return Err(decode_err("expected OP_CHECKMULTISIG at end"));
        }
        Self::multisig(pubkeys, m.value(), n.value())
    }

    pub fn from_hex(script: &str) -> Result<Self> {
        let bytes = hex::decode(script).map_err(|e| WalletError::Decode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> ByteString {
        let mut builder = ScriptBuilder::new().push_small_int(self.m);
        for key in &self.pubkeys {
            builder = builder.push_slice(key.as_bytes());
        }
        builder
            .push_small_int(self.n)
            .push_opcode(OP_CHECKMULTISIG)
            .into_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Required signature count M
    pub fn threshold(&self) -> usize {
        self.m.value()
    }

    pub fn pubkeys(&self) -> &[PublicKey] {
        &self.pubkeys
    }
}

impl TryFrom<String> for RedeemScript {
    type Error = WalletError;

    fn try_from(script: String) -> Result<Self> {
        Self::from_hex(&script)
    }
}

impl From<RedeemScript> for String {
    fn from(script: RedeemScript) -> Self {
        script.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDEEM_2_OF_3: &str = "522103519842d08ea56a635bfa8dd617b8e33f0426530d8e201107dd9a6af9493bd4872102d3ac8c0cb7b99a26cd66269a312afe4e0a621579dfe8b33e29c597a32a6165442102696187262f522cf1fa2c30c5cd6853c4a6c51ad5ba418abb4e3898dbc5a93d2e53ae";

    fn pubkey(fill: u8) -> PublicKey {
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&[fill; 32]);
        PublicKey::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_p2pkh_script() {
        let hash: [u8; 20] = hex::decode("da46f44467949ac9321b16402c32bbeede5e3e5f")
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(
            hex::encode(p2pkh_script(&hash)),
            "76a914da46f44467949ac9321b16402c32bbeede5e3e5f88ac"
        );
    }

    #[test]
    fn test_p2sh_script() {
        let script = p2sh_script(&[0x11; 20]);
        assert_eq!(script.len(), 23);
        assert_eq!(script[0], OP_HASH160);
        assert_eq!(script[1], 0x14);
        assert_eq!(script[22], OP_EQUAL);
    }

    #[test]
    fn test_null_data_script() {
        assert_eq!(
            hex::encode(null_data_script(b"hello world")),
            "6a0b68656c6c6f20776f726c64"
        );
    }

    #[test]
    fn test_null_data_script_long_payload_uses_pushdata1() {
        let script = null_data_script(&[0x42; 80]);
        assert_eq!(&script[..3], &[OP_RETURN, OP_PUSHDATA1, 80]);
        assert_eq!(script.len(), 83);
    }

    #[test]
    fn test_script_for_address_selects_kind() {
        let network = Network::mainnet();
        let p2pkh = script_for_address(&Address::new("t1dmkK8t4PWQwWLaRx63R4U1ZYEXXJn9XBS"), &network).unwrap();
        assert_eq!(p2pkh[0], OP_DUP);
        let p2sh = script_for_address(&Address::new("t3RX4vkXVB6mbuLW9ZXwAkoPMkE5gJPARgE"), &network).unwrap();
        assert_eq!(p2sh[0], OP_HASH160);
    }

    #[test]
    fn test_redeem_script_roundtrip_from_hex() {
        let script = RedeemScript::from_hex(REDEEM_2_OF_3).unwrap();
        assert_eq!(script.threshold(), 2);
        assert_eq!(script.pubkeys().len(), 3);
        assert_eq!(
            script.pubkeys()[0].to_hex(),
            "03519842d08ea56a635bfa8dd617b8e33f0426530d8e201107dd9a6af9493bd487"
        );
        assert_eq!(script.to_hex(), REDEEM_2_OF_3);
    }

    #[test]
    fn test_redeem_script_preserves_key_order() {
        let keys = vec![pubkey(9), pubkey(1), pubkey(5)];
        let script = RedeemScript::multisig(keys.clone(), 2, 3).unwrap();
        assert_eq!(script.pubkeys(), keys.as_slice());
        let bytes = script.to_bytes();
        assert_eq!(bytes[0], 0x52);
        assert_eq!(bytes[2], 0x02);
        assert_eq!(bytes[3], 9);
        assert_eq!(bytes[bytes.len() - 2], 0x53);
        assert_eq!(bytes[bytes.len() - 1], OP_CHECKMULTISIG);
    }

    #[test]
    fn test_redeem_script_threshold_errors() {
        let keys = vec![pubkey(1), pubkey(2)];
        assert!(matches!(
            RedeemScript::multisig(keys.clone(), 0, 2),
            Err(WalletError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            RedeemScript::multisig(keys.clone(), 3, 2),
            Err(WalletError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            RedeemScript::multisig(keys, 1, 3),
            Err(WalletError::InvalidThreshold { .. })
        ));
        let sixteen: Vec<_> = (0..16).map(pubkey).collect();
        assert!(matches!(
            RedeemScript::multisig(sixteen, 2, 16),
            Err(WalletError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_small_int_bounds() {
        assert!(SmallInt::new(0).is_none());
        assert!(SmallInt::new(17).is_none());
        assert!(SmallInt::new(200).is_none());
        assert_eq!(SmallInt::new(1).unwrap().opcode(), OP_1);
        assert_eq!(SmallInt::new(16).unwrap().opcode(), OP_16);
        assert!(SmallInt::from_opcode(OP_RESERVED).is_none());
        assert!(SmallInt::from_opcode(OP_16 + 1).is_none());
        assert_eq!(SmallInt::from_opcode(0x53).unwrap().value(), 3);
    }

    #[test]
    fn test_redeem_script_json_is_script_hex() {
        let script = RedeemScript::from_hex(REDEEM_2_OF_3).unwrap();
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, format!("\"{}\"", REDEEM_2_OF_3));
        assert_eq!(serde_json::from_str::<RedeemScript>(&json).unwrap(), script);
    }

    #[test]
    fn test_redeem_script_json_rejects_invalid_threshold() {
        // m = 200 with a single key; OP_M is not a small-integer opcode
        let bad_m = format!("\"c821{}51ae\"", pubkey(7).to_hex());
        assert!(serde_json::from_str::<RedeemScript>(&bad_m).is_err());
        // 3-of-1
        let m_over_n = format!("\"5321{}51ae\"", pubkey(7).to_hex());
        assert!(serde_json::from_str::<RedeemScript>(&m_over_n).is_err());
        // field-wise shape is not accepted
        let fields = format!("{{\"pubkeys\":[\"{}\"],\"m\":200}}", pubkey(7).to_hex());
        assert!(serde_json::from_str::<RedeemScript>(&fields).is_err());
    }

    #[test]
    fn test_redeem_script_from_bytes_rejects_garbage() {
        assert!(RedeemScript::from_bytes(&[]).is_err());
        assert!(RedeemScript::from_bytes(&[0x52, 0x52, 0xae]).is_err());
        let mut truncated = hex::decode(REDEEM_2_OF_3).unwrap();
        truncated.pop();
        assert!(RedeemScript::from_bytes(&truncated).is_err());
        let mut trailing = hex::decode(REDEEM_2_OF_3).unwrap();
        trailing.push(0x00);
        assert!(RedeemScript::from_bytes(&trailing).is_err());
    }
}
