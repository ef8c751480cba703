//! # Zero-Primitives
//!
//! Offline wallet primitives for a Bitcoin-derived chain with transparent and
//! shielded addresses.
//!
//! This crate turns passphrases into keys, keys into addresses, UTXOs and
//! recipients into raw transactions, and raw transactions into signed ones.
//! Nothing here touches the network or a node; every function is a
//! deterministic transformation of its inputs.
//!
//! ## Layout
//!
//! - `codec`, `hash`, `base58`: wire primitives
//! - `keys`, `shielded`: transparent and shielded key chains
//! - `script`, `transaction`: locking scripts and the transaction wire format
//! - `sighash`, `multisig`: signature hashing, signing and multisig assembly
//!
//! ## Usage
//!
//! ```rust
//! use zero_primitives::WalletPrimitives;
//! use zero_primitives::types::*;
//!
//! let wallet = WalletPrimitives::default();
//! let key = wallet.private_key_from_passphrase("correct horse battery staple");
//! let address = wallet.address_from_private_key(&key, true).unwrap();
//! assert!(address.as_str().starts_with("t1"));
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod network;
pub mod codec;
pub mod hash;
pub mod base58;
pub mod keys;
pub mod script;
pub mod transaction;
pub mod sighash;
pub mod multisig;
pub mod shielded;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{Result, WalletError};
pub use network::Network;
pub use script::{RedeemScript, SmallInt};
pub use sighash::SighashType;
pub use shielded::{PayingKey, ShieldedSpendingKey, TransmissionKey};

/// Wallet operations bound to one network's prefixes
///
/// # Examples
///
/// ```
/// use zero_primitives::{Network, WalletPrimitives};
/// use zero_primitives::types::*;
///
/// let wallet = WalletPrimitives::new(Network::mainnet());
///
/// let utxo = Utxo::new(
///     "2704a392f88573cb26775e6cf394e4039b430a2375becac454e3e57c88aed59d",
///     0,
///     vec![],
/// )
/// .unwrap();
/// let to = Address::new("t1dmkK8t4PWQwWLaRx63R4U1ZYEXXJn9XBS");
///
/// let tx = wallet
///     .create_raw_transaction(&[utxo], &[Recipient::pay(to, 10000)])
///     .unwrap();
/// assert_eq!(tx.inputs.len(), 1);
/// assert_eq!(tx.outputs[0].value, 10000);
/// ```
#[derive(Debug, Clone)]
pub struct WalletPrimitives {
    network: Network,
}

impl WalletPrimitives {
    /// Create a wallet for the given network parameters
    ///
    /// # Examples
    ///
    /// ```
    /// use zero_primitives::{Network, WalletPrimitives};
    ///
    /// let wallet = WalletPrimitives::new(Network::testnet());
    /// assert_eq!(wallet.network().name, "testnet");
    /// ```
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Derive a private key as SHA256 of the passphrase
    pub fn private_key_from_passphrase(&self, passphrase: &str) -> PrivateKey {
        keys::private_key_from_passphrase(passphrase)
    }

    /// Encode a private key in wallet import format
    ///
    /// # Examples
    ///
    /// ```
    /// use zero_primitives::WalletPrimitives;
    /// use zero_primitives::types::*;
    ///
    /// let wallet = WalletPrimitives::default();
    /// let key: PrivateKey = "2c3a48576fe6e8a466e78cd2957c9dc62128135540bbea0685d7c4a23ea35a6c"
    ///     .parse()
    ///     .unwrap();
    /// let wif = wallet.private_key_to_wif(&key, true);
    /// assert_eq!(wallet.private_key_from_wif(&wif).unwrap(), key);
    /// ```
    pub fn private_key_to_wif(&self, key: &PrivateKey, compressed: bool) -> String {
        keys::to_wif(key, compressed, &self.network)
    }

    pub fn private_key_from_wif(&self, wif: &str) -> Result<PrivateKey> {
        keys::from_wif(wif, &self.network)
    }

    pub fn public_key_from_private_key(&self, key: &PrivateKey, compressed: bool) -> Result<PublicKey> {
        keys::public_key_from_private_key(key, compressed)
    }

    pub fn address_from_public_key(&self, pubkey: &PublicKey) -> Address {
        keys::address_from_public_key(pubkey, &self.network)
    }

    pub fn address_from_private_key(&self, key: &PrivateKey, compressed: bool) -> Result<Address> {
        let pubkey = keys::public_key_from_private_key(key, compressed)?;
        Ok(keys::address_from_public_key(&pubkey, &self.network))
    }

    pub fn decode_address(&self, address: &Address) -> Result<(AddressKind, [u8; HASH160_SIZE])> {
        keys::decode_address(address, &self.network)
    }

    /// Build an m-of-n redeem script, keeping key order
    pub fn multisig_redeem_script(&self, pubkeys: &[PublicKey], m: usize, n: usize) -> Result<RedeemScript> {
        keys::multisig_redeem_script(pubkeys, m, n)
    }

    pub fn address_from_redeem_script(&self, redeem_script: &RedeemScript) -> Address {
        keys::address_from_redeem_script(redeem_script, &self.network)
    }

    pub fn create_raw_transaction(&self, utxos: &[Utxo], recipients: &[Recipient]) -> Result<Transaction> {
        transaction::create_raw_transaction(utxos, recipients, &self.network)
    }

    pub fn serialize_transaction(&self, tx: &Transaction) -> String {
        tx.to_hex()
    }

    pub fn deserialize_transaction(&self, hex: &str) -> Result<Transaction> {
        Transaction::from_hex(hex)
    }

    /// Sign a pay-to-pubkey-hash input in place with `SIGHASH_ALL`
    ///
    /// # Examples
    ///
    /// ```
    /// use zero_primitives::WalletPrimitives;
    /// use zero_primitives::script::p2pkh_script;
    /// use zero_primitives::types::*;
    ///
    /// let wallet = WalletPrimitives::default();
    /// let key = wallet.private_key_from_passphrase("sign me");
    /// let pubkey = wallet.public_key_from_private_key(&key, true).unwrap();
    /// let (_, hash) = wallet.decode_address(&wallet.address_from_public_key(&pubkey)).unwrap();
    ///
    /// let utxo = Utxo::new(&"11".repeat(32), 0, p2pkh_script(&hash)).unwrap();
    /// let to = wallet.address_from_public_key(&pubkey);
    /// let mut tx = wallet
    ///     .create_raw_transaction(&[utxo.clone()], &[Recipient::pay(to, 5000)])
    ///     .unwrap();
    ///
    /// wallet.sign_transaction(&mut tx, 0, &utxo.script_pubkey, &key, true).unwrap();
    /// assert!(!tx.inputs[0].script_sig.is_empty());
    /// ```
    pub fn sign_transaction(
        &self,
        tx: &mut Transaction,
        index: usize,
        prev_script_pubkey: &[u8],
        key: &PrivateKey,
        compressed: bool,
    ) -> Result<ByteString> {
        sighash::sign_input(tx, index, prev_script_pubkey, key, compressed, SighashType::ALL)
    }

    pub fn multi_sign(
        &self,
        tx: &Transaction,
        index: usize,
        key: &PrivateKey,
        redeem_script: &RedeemScript,
    ) -> Result<Signature> {
        sighash::multi_sign(tx, index, key, redeem_script, SighashType::ALL)
    }

    pub fn apply_multi_signatures(
        &self,
        tx: &mut Transaction,
        index: usize,
        signatures: &[Signature],
        redeem_script: &RedeemScript,
    ) -> Result<ByteString> {
        multisig::apply_multi_signatures(tx, index, signatures, redeem_script)
    }

    pub fn order_signatures(
        &self,
        tx: &Transaction,
        index: usize,
        signatures: &[Signature],
        redeem_script: &RedeemScript,
    ) -> Result<Vec<Signature>> {
        multisig::order_signatures(tx, index, signatures, redeem_script)
    }

    pub fn shielded_spending_key_from_passphrase(&self, passphrase: &str) -> ShieldedSpendingKey {
        shielded::spending_key_from_passphrase(passphrase)
    }

    pub fn shielded_spending_key_to_wif(&self, key: &ShieldedSpendingKey) -> String {
        shielded::spending_key_to_wif(key, &self.network)
    }

    pub fn paying_key(&self, key: &ShieldedSpendingKey) -> PayingKey {
        shielded::paying_key_from_spending_key(key)
    }

    pub fn transmission_key(&self, key: &ShieldedSpendingKey) -> TransmissionKey {
        shielded::transmission_key_from_spending_key(key)
    }

    /// Encode a shielded address from its paying and transmission keys
    ///
    /// # Examples
    ///
    /// ```
    /// use zero_primitives::WalletPrimitives;
    ///
    /// let wallet = WalletPrimitives::default();
    /// let a_sk = wallet.shielded_spending_key_from_passphrase("Z pigs likes to snooze. ZZZZ");
    /// let address = wallet.shielded_address(&wallet.paying_key(&a_sk), &wallet.transmission_key(&a_sk));
    /// assert!(address.as_str().starts_with("zc"));
    /// ```
    pub fn shielded_address(&self, paying: &PayingKey, transmission: &TransmissionKey) -> Address {
        shielded::address(paying, transmission, &self.network)
    }

    pub fn shielded_viewing_key(&self, key: &ShieldedSpendingKey) -> String {
        shielded::viewing_key(key, &self.network)
    }
}

impl Default for WalletPrimitives {
    fn default() -> Self {
        Self::new(Network::mainnet())
    }
}
