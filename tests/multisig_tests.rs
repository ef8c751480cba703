//! Multisig coordination: redeem scripts, per-key signatures and assembly

use zero_primitives::*;
use zero_primitives::keys::from_wif;

const REDEEM_2_OF_3: &str = "522103519842d08ea56a635bfa8dd617b8e33f0426530d8e201107dd9a6af9493bd4872102d3ac8c0cb7b99a26cd66269a312afe4e0a621579dfe8b33e29c597a32a6165442102696187262f522cf1fa2c30c5cd6853c4a6c51ad5ba418abb4e3898dbc5a93d2e53ae";

fn keys_from_wifs(wifs: &[&str], network: &Network) -> Vec<PrivateKey> {
    wifs.iter().map(|wif| from_wif(wif, network).unwrap()).collect()
}

#[test]
fn test_two_of_five_testnet() {
    let wallet = WalletPrimitives::new(Network::testnet());
    let keys = keys_from_wifs(
        &[
            "cT3PtbJfU3VVDR9xp667eqqojDhytDbLGkEjTVZ9fDjXYr73FUE4",
            "cNHYho4iuSjiTwR9J56g5HT9SbkXP5Fs2Pq4qM97FTpjGT4psJ4u",
            "cUgD3WxGu6WFC2yyFv6jubxcHGkid62sp77M5HE2aYgsj6FcFcyW",
            "cTs2Zm57Bd18UPiT5JH1shbSd4XBBvdipCebMtwcnrZDH2sh2px2",
            "cPSDZ6VjeLEsSx6JYetJAajN1p5L5Vod8k5haQH9s2M4nyS48NnW",
        ],
        wallet.network(),
    );
    let pubkeys: Vec<PublicKey> = keys
        .iter()
        .map(|k| wallet.public_key_from_private_key(k, true).unwrap())
        .collect();
    let redeem = wallet.multisig_redeem_script(&pubkeys, 2, 5).unwrap();
    assert!(wallet.address_from_redeem_script(&redeem).as_str().starts_with("t2"));

    let utxo = Utxo::new(
        "d6f04de4f1ab745d8d7d3d6846b718b3bef4baf857af4f26e3847162317982d9",
        0,
        vec![],
    )
    .unwrap();
    let mut tx = wallet
        .create_raw_transaction(
            &[utxo],
            &[Recipient::pay(Address::new("tmRLDNDQ5NSy8YdhvvCwZnz7tRviQgPoNwK"), 5000000000)],
        )
        .unwrap();

    let sig1 = wallet.multi_sign(&tx, 0, &keys[0], &redeem).unwrap();
    let sig2 = wallet.multi_sign(&tx, 0, &keys[1], &redeem).unwrap();
    wallet.apply_multi_signatures(&mut tx, 0, &[sig1, sig2], &redeem).unwrap();

    assert_eq!(
        wallet.serialize_transaction(&tx),
        "0100000001d9827931627184e3264faf57f8baf4beb318b746683d7d8d5d74abf1e44df0d600000000fd410100473044022018b4f1f5d66010ab72a2c7bf2a44e76246c59fb7fbfbfe78f764493a19ae081b02200df3d4bd9c78dae669fb03204a53f6f125ab4575606231a9afe02173206af9b201483045022100cb8c6e7c9e4ceb73bcbfe3f809f5fe13c28e9c7118f7a9cf58f5ee0f262fb887022012ef27eab403954447da28ff5af59ed1a629a1ba08ef3822c320ce661a810ca5014cad522103e05e33c3322eebb714a070b3a3d8c4d8df24afaa954b73588fb93d225459a8ec21036e8b46ab143d44946080dfe980ff4b17df278e49bae86002c613b23732b20af32103184c5dad8794b6d9b129748e4bb6f7cc56de42bc05e48f2a09521f8018e637e12103b9119362574b8ce5812f72f23e9bca338a90c4f47dfd0dbb3b9e7aa596b422ad2102d52494ff1c42d4e5dd81bc4940368e15137bb62f0963300217291d11682ccc2255aeffffffff0100f2052a010000001976a914ab523674d9f2ed5a0b300aeb072fc09801363f9f88ac00000000"
    );
}

const SIGNED_2_OF_3: &str = "01000000018195083e888626721aa48258bf97a97c98c3f1594c675393abcae94d0624f3f500000000fc0047304402200f15811d9116230ff14d2b5af3014f7d42e7e1ffb280169b3dc003f02d78039302201d0e33ffd19d9aaafce0c1bbff1913ad244678e963f65bd493a7502d7eb65fa50147304402205fd2a39a83fbe6c8a2e188ef7af2f259bc5bd205ff2f965066a55b0a1e4afb6f022011ec5f1c568ec8b70e41fe353ca5a2cc53c1a12678950efaad21c2f836423c59014c69522103519842d08ea56a635bfa8dd617b8e33f0426530d8e201107dd9a6af9493bd4872102d3ac8c0cb7b99a26cd66269a312afe4e0a621579dfe8b33e29c597a32a6165442102696187262f522cf1fa2c30c5cd6853c4a6c51ad5ba418abb4e3898dbc5a93d2e53aeffffffff0110270000000000001976a914964f1832d9aa7e943d5dd8f84862393b935bbbad88ac00000000";

fn two_of_three_setup() -> (WalletPrimitives, Vec<PrivateKey>, RedeemScript, Transaction) {
    let wallet = WalletPrimitives::default();
    let keys = keys_from_wifs(
        &[
            "KxvE58rxEwckkCjemDVdMDp7wzgosnyX1oyjzWmrcAVpV7EaZdSP",
            "L5bpskJWAGGWR1GA9SJkCQ2ndHkezqm8GuoWaBesrrwnsa1roSN6",
            "L2sjwCsdZQmckKkTKGDqhKcWtbe3EU2FL4N1YHpD2SC1GhHRhqxF",
        ],
        wallet.network(),
    );
    let redeem = RedeemScript::from_hex(REDEEM_2_OF_3).unwrap();
    let utxo = Utxo::new(
        "f5f324064de9caab9353674c59f1c3987ca997bf5882a41a722686883e089581",
        0,
        vec![],
    )
    .unwrap();
    let tx = wallet
        .create_raw_transaction(
            &[utxo],
            &[Recipient::pay(Address::new("t1XaN7hDMnc7SKCWuFx75MbMtyuRW8Dz2jJ"), 10000)],
        )
        .unwrap();
    (wallet, keys, redeem, tx)
}

#[test]
fn test_two_of_three_mainnet() -> anyhow::Result<()> {
    let (wallet, keys, redeem, mut tx) = two_of_three_setup();

    let sig1 = wallet.multi_sign(&tx, 0, &keys[2], &redeem)?;
    let sig2 = wallet.multi_sign(&tx, 0, &keys[1], &redeem)?;
    assert_eq!(
        sig1.to_hex(),
        "304402200f15811d9116230ff14d2b5af3014f7d42e7e1ffb280169b3dc003f02d78039302201d0e33ffd19d9aaafce0c1bbff1913ad244678e963f65bd493a7502d7eb65fa501"
    );
    assert_eq!(
        sig2.to_hex(),
        "304402205fd2a39a83fbe6c8a2e188ef7af2f259bc5bd205ff2f965066a55b0a1e4afb6f022011ec5f1c568ec8b70e41fe353ca5a2cc53c1a12678950efaad21c2f836423c5901"
    );

    wallet.apply_multi_signatures(&mut tx, 0, &[sig1, sig2], &redeem)?;
    assert_eq!(wallet.serialize_transaction(&tx), SIGNED_2_OF_3);
    Ok(())
}

#[test]
fn test_two_of_three_deserialized_structure() {
    let tx = Transaction::from_hex(SIGNED_2_OF_3).unwrap();
    assert_eq!(tx.version, 1);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(
        tx.inputs[0].prevout.txid_hex(),
        "f5f324064de9caab9353674c59f1c3987ca997bf5882a41a722686883e089581"
    );
    assert_eq!(tx.inputs[0].prevout.index, 0);
    assert_eq!(tx.inputs[0].sequence, 0xffffffff);
    assert_eq!(tx.inputs[0].script_sig[0], OP_0);
    assert!(tx.inputs[0].script_sig.ends_with(&hex::decode(REDEEM_2_OF_3).unwrap()));
    assert_eq!(tx.outputs.len(), 1);
    assert_eq!(tx.outputs[0].value, 10000);
    assert_eq!(
        hex::encode(&tx.outputs[0].script_pubkey),
        "76a914964f1832d9aa7e943d5dd8f84862393b935bbbad88ac"
    );
}

#[test]
fn test_order_signatures_fixes_swapped_input() {
    let (wallet, keys, redeem, mut tx) = two_of_three_setup();
    let sig_key3 = wallet.multi_sign(&tx, 0, &keys[2], &redeem).unwrap();
    let sig_key2 = wallet.multi_sign(&tx, 0, &keys[1], &redeem).unwrap();

    // The redeem script's key order differs from the WIF list order; trial
    // verification recovers the order OP_CHECKMULTISIG expects
    let ordered = wallet
        .order_signatures(&tx, 0, &[sig_key2.clone(), sig_key3.clone()], &redeem)
        .unwrap();
    assert_eq!(ordered, vec![sig_key3, sig_key2]);

    wallet.apply_multi_signatures(&mut tx, 0, &ordered, &redeem).unwrap();
    assert_eq!(wallet.serialize_transaction(&tx), SIGNED_2_OF_3);
}

#[test]
fn test_redeem_script_address_roundtrip() {
    let wallet = WalletPrimitives::default();
    let redeem = RedeemScript::from_hex(REDEEM_2_OF_3).unwrap();
    assert_eq!(redeem.threshold(), 2);
    assert_eq!(redeem.pubkeys().len(), 3);
    assert_eq!(redeem.to_hex(), REDEEM_2_OF_3);

    let address = wallet.address_from_redeem_script(&redeem);
    let (kind, hash) = wallet.decode_address(&address).unwrap();
    assert_eq!(kind, AddressKind::ScriptHash);
    assert_eq!(hash, hash::hash160(&redeem.to_bytes()));
}

#[test]
fn test_multisig_signature_leaves_transaction_untouched() {
    let (wallet, keys, redeem, tx) = two_of_three_setup();
    let before = tx.clone();
    wallet.multi_sign(&tx, 0, &keys[0], &redeem).unwrap();
    assert_eq!(tx, before);
}

#[test]
fn test_threshold_of_one() {
    let (wallet, keys, redeem, _) = two_of_three_setup();
    let pubkeys = redeem.pubkeys().to_vec();
    let one_of_three = wallet.multisig_redeem_script(&pubkeys, 1, 3).unwrap();

    let utxo = Utxo::new(&"cd".repeat(32), 2, vec![]).unwrap();
    let mut tx = wallet
        .create_raw_transaction(&[utxo], &[Recipient::pay(Address::new("t1XaN7hDMnc7SKCWuFx75MbMtyuRW8Dz2jJ"), 1)])
        .unwrap();
    let sig = wallet.multi_sign(&tx, 0, &keys[0], &one_of_three).unwrap();
    let script_sig = wallet.apply_multi_signatures(&mut tx, 0, &[sig.clone()], &one_of_three).unwrap();
    assert_eq!(script_sig[0], OP_0);
    assert_eq!(&script_sig[2..2 + sig.as_bytes().len()], sig.as_bytes());
}
