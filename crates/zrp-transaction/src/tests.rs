//! Tests for the zrp-transaction crate.
//!
//! Covers wire-format round-trips across every varint length class,
//! transaction assembly from funding records, end-to-end signing with
//! replay-protected P2PKH scripts, and the structure of the produced
//! unlocking scripts.

use zrp_primitives::chainhash::Hash;
use zrp_primitives::ec::{PrivateKey, Signature};
use zrp_script::{Address, Network, Script};

use crate::input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::output::TransactionOutput;
use crate::sighash::{self, SighashType};
use crate::template::ReplayAnchor;
use crate::transaction::Transaction;
use crate::utxo::{Recipient, SpendableOutput};
use crate::TransactionError;

/// A fixed signing key used across the signing tests.
const TEST_KEY_HEX: &str = "18e14a7b6a307f426a94f8114701e7c8e774e7f9a47e2c2035db29a206321725";

/// The funding txid from the end-to-end scenario.
const FUNDING_TXID: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

fn test_key() -> PrivateKey {
    PrivateKey::from_hex(TEST_KEY_HEX).expect("valid test key")
}

fn test_anchor() -> ReplayAnchor {
    let hash = Hash::from_hex(
        "0000000000000000000000000000000000000000000000000000000000bb0a78",
    )
    .expect("valid block hash");
    ReplayAnchor::new(142_091, hash)
}

fn recipient_address() -> String {
    Address::from_public_key(&test_key().pub_key(), Network::Mainnet).address_string
}

// -----------------------------------------------------------------------
// Wire-format round-trips
// -----------------------------------------------------------------------

/// Build a one-in/N-out transaction whose scripts have the given lengths.
fn tx_with_script_lengths(lengths: &[usize]) -> Transaction {
    let mut tx = Transaction::new();

    let mut input = TransactionInput::new();
    input.source_txid = [0xaa; 32];
    input.source_tx_out_index = 1;
    tx.add_input(input);

    for (i, &len) in lengths.iter().enumerate() {
        tx.add_output(TransactionOutput {
            satoshis: (i as u64 + 1) * 1000,
            locking_script: Script::from_bytes(&vec![0x6a; len]),
        });
    }
    tx
}

/// Round-trip transactions whose script lengths cover every varint
/// length class: 1-byte (0, 1, 252), 3-byte (253, 65535), and 5-byte
/// (65536).
#[test]
fn test_roundtrip_varint_length_classes() {
    for &len in &[0usize, 1, 252, 253, 65535, 65536] {
        let tx = tx_with_script_lengths(&[len]);
        let bytes = tx.to_bytes();
        let parsed = Transaction::from_bytes(&bytes)
            .unwrap_or_else(|e| panic!("script length {}: {}", len, e));
        assert_eq!(parsed, tx, "round-trip failed for script length {}", len);
    }
}

#[test]
fn test_roundtrip_hex() {
    let tx = tx_with_script_lengths(&[25, 0, 61]);
    let parsed = Transaction::from_hex(&tx.to_hex()).expect("should parse own hex");
    assert_eq!(parsed, tx);
}

#[test]
fn test_trailing_bytes_error() {
    let tx = tx_with_script_lengths(&[25]);
    let mut bytes = tx.to_bytes();
    bytes.extend_from_slice(&[0xde, 0xad]);
    assert!(matches!(
        Transaction::from_bytes(&bytes),
        Err(TransactionError::SerializationError(_))
    ));
}

#[test]
fn test_truncated_bytes_error() {
    let tx = tx_with_script_lengths(&[25]);
    let bytes = tx.to_bytes();
    assert!(Transaction::from_bytes(&bytes[..bytes.len() - 3]).is_err());
}

/// A script length claiming nearly u64::MAX bytes must surface a
/// serialization error, not overflow the reader's bounds check.
#[test]
fn test_huge_script_length_is_error() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]); // version
    bytes.push(0x01); // input count
    bytes.extend_from_slice(&[0xaa; 32]); // outpoint txid
    bytes.extend_from_slice(&[0x00; 4]); // vout
    bytes.extend_from_slice(&[0xff; 9]); // script length varint = u64::MAX
    assert!(matches!(
        Transaction::from_bytes(&bytes),
        Err(TransactionError::SerializationError(_))
    ));
}

/// A huge input count with no input data behind it errors out instead of
/// panicking on preallocation.
#[test]
fn test_huge_input_count_is_error() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]); // version
    bytes.extend_from_slice(&[0xff; 9]); // input count varint = u64::MAX
    assert!(matches!(
        Transaction::from_bytes(&bytes),
        Err(TransactionError::SerializationError(_))
    ));
}

/// The SIGHASH_SINGLE placeholder amount serializes as eight 0xFF bytes.
#[test]
fn test_max_amount_serializes_as_ff() {
    let mut tx = Transaction::new();
    let mut input = TransactionInput::new();
    input.source_txid = [0x01; 32];
    tx.add_input(input);
    tx.add_output(TransactionOutput {
        satoshis: u64::MAX,
        locking_script: Script::new(),
    });

    let bytes = tx.to_bytes();
    // version(4) + count(1) + input(32+4+1+4) + count(1) = offset 47
    assert_eq!(&bytes[47..55], &[0xff; 8]);

    let parsed = Transaction::from_bytes(&bytes).expect("should parse");
    assert_eq!(parsed.outputs[0].satoshis, u64::MAX);
}

#[test]
fn test_tx_id_display_order() {
    let tx = tx_with_script_lengths(&[25]);
    let id = tx.tx_id();
    let id_hex = tx.tx_id_hex();

    let mut reversed = id;
    reversed.reverse();
    assert_eq!(id_hex, hex::encode(reversed));
    assert_eq!(id_hex.len(), 64);
}

// -----------------------------------------------------------------------
// Assembly from funding records
// -----------------------------------------------------------------------

#[test]
fn test_from_utxos_builds_unsigned_tx() {
    let history = vec![SpendableOutput {
        tx_id: FUNDING_TXID.to_string(),
        output_index: 0,
        satoshis: 100_000_000,
        address: recipient_address(),
    }];
    let recipients = vec![Recipient {
        address: recipient_address(),
        satoshis: 99_990_000,
    }];

    let tx = Transaction::from_utxos(&history, &recipients, &test_anchor())
        .expect("should assemble");

    assert_eq!(tx.version, 1);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 1);
    assert_eq!(tx.inputs[0].source_txid, [0xaa; 32]);
    assert_eq!(tx.inputs[0].source_tx_out_index, 0);
    assert_eq!(tx.inputs[0].sequence_number, DEFAULT_SEQUENCE_NUMBER);
    assert!(tx.inputs[0].unlocking_script.is_none());
    assert_eq!(tx.outputs[0].satoshis, 99_990_000);
    assert!(tx.outputs[0].locking_script.is_p2pkh_replay());
}

#[test]
fn test_from_utxos_p2sh_recipient() {
    let p2sh = Address::from_script_hash(&[0x33; 20], Network::Mainnet);
    let recipients = vec![Recipient {
        address: p2sh.address_string,
        satoshis: 5000,
    }];

    let tx = Transaction::from_utxos(&[], &recipients, &test_anchor())
        .expect("should assemble");
    assert!(tx.outputs[0].locking_script.is_p2sh());
}

#[test]
fn test_from_utxos_bad_txid() {
    let history = vec![SpendableOutput {
        tx_id: "zz not hex".to_string(),
        output_index: 0,
        satoshis: 1000,
        address: recipient_address(),
    }];
    assert!(matches!(
        Transaction::from_utxos(&history, &[], &test_anchor()),
        Err(TransactionError::MalformedFunding(_))
    ));
}

#[test]
fn test_from_utxos_bad_recipient_address() {
    let recipients = vec![Recipient {
        address: "definitely not an address".to_string(),
        satoshis: 1000,
    }];
    assert!(matches!(
        Transaction::from_utxos(&[], &recipients, &test_anchor()),
        Err(TransactionError::MalformedFunding(_))
    ));
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

fn build_scenario_tx() -> Transaction {
    let history = vec![SpendableOutput {
        tx_id: FUNDING_TXID.to_string(),
        output_index: 0,
        satoshis: 100_000_000,
        address: recipient_address(),
    }];
    let recipients = vec![Recipient {
        address: recipient_address(),
        satoshis: 99_990_000,
    }];
    Transaction::from_utxos(&history, &recipients, &test_anchor()).expect("should assemble")
}

/// End-to-end: assemble from one funding entry and one recipient, sign
/// with ALL, and check the serialized layout byte by byte.
#[test]
fn test_end_to_end_sign_all() {
    let mut tx = build_scenario_tx();
    tx.sign_input(0, &test_key(), SighashType::all(), &test_anchor())
        .expect("should sign");

    let hex_str = tx.to_hex();
    assert!(hex_str.starts_with("01000000"), "version bytes");
    assert_eq!(&hex_str[8..10], "01", "input count byte");

    let bytes = tx.to_bytes();
    // The outpoint txid follows the version and count bytes.
    assert_eq!(&bytes[5..37], &[0xaa; 32]);

    // Unlocking script: push(sig||code) push(pubkey).
    let script = tx.inputs[0]
        .unlocking_script
        .as_ref()
        .expect("input should be signed");
    let sb = script.to_bytes();
    let sig_len = sb[0] as usize;
    assert_eq!(sb[1], 0x30, "DER sequence tag");
    assert_eq!(sb[sig_len], 0x01, "trailing sighash byte");
    let pubkey_len = sb[1 + sig_len] as usize;
    assert_eq!(pubkey_len, 33, "compressed pubkey length");
    assert_eq!(
        sb.len(),
        1 + sig_len + 1 + pubkey_len,
        "script length prefix matches signature plus pubkey"
    );
    assert_eq!(
        &sb[2 + sig_len..],
        &test_key().pub_key().to_compressed(),
        "pubkey bytes"
    );

    // The serialized tx round-trips with the signature in place.
    let parsed = Transaction::from_bytes(&bytes).expect("should parse signed tx");
    assert_eq!(parsed, tx);
}

/// Signing the same input twice produces byte-identical scripts
/// (RFC6979 deterministic nonces).
#[test]
fn test_signing_is_deterministic() {
    let mut tx1 = build_scenario_tx();
    let mut tx2 = build_scenario_tx();
    tx1.sign_input(0, &test_key(), SighashType::all(), &test_anchor())
        .expect("should sign");
    tx2.sign_input(0, &test_key(), SighashType::all(), &test_anchor())
        .expect("should sign");
    assert_eq!(
        tx1.inputs[0].unlocking_script,
        tx2.inputs[0].unlocking_script
    );
}

/// The produced signature verifies against the digest it was made over.
#[test]
fn test_signature_verifies_against_digest() {
    let mut tx = build_scenario_tx();
    let key = test_key();
    tx.sign_input(0, &key, SighashType::all(), &test_anchor())
        .expect("should sign");

    // Recompute the digest the signature commits to: the preimage uses
    // the signer's own locking script and an otherwise-unsigned tx.
    let unsigned = build_scenario_tx();
    let script_code =
        crate::template::p2pkh_replay::lock_hash(&key.pub_key().hash160(), &test_anchor())
            .expect("should build script code");
    let digest = sighash::signature_hash(&unsigned, 0, &script_code, SighashType::all())
        .expect("should hash");

    let sb = tx.inputs[0].unlocking_script.as_ref().unwrap().to_bytes();
    let sig_len = sb[0] as usize;
    let der = &sb[1..sig_len]; // excludes the trailing sighash byte
    let signature = Signature::from_der(der).expect("should parse DER");
    assert!(signature.verify(&digest, &key.pub_key()));
}

/// Multi-input signing proceeds sequentially; each pass signs over the
/// accumulated script state, and both inputs end up populated.
#[test]
fn test_sequential_multi_input_signing() {
    let history = vec![
        SpendableOutput {
            tx_id: FUNDING_TXID.to_string(),
            output_index: 0,
            satoshis: 50_000_000,
            address: recipient_address(),
        },
        SpendableOutput {
            tx_id: FUNDING_TXID.to_string(),
            output_index: 1,
            satoshis: 50_000_000,
            address: recipient_address(),
        },
    ];
    let recipients = vec![Recipient {
        address: recipient_address(),
        satoshis: 99_990_000,
    }];
    let mut tx =
        Transaction::from_utxos(&history, &recipients, &test_anchor()).expect("assemble");

    let key = test_key();
    tx.sign_input(0, &key, SighashType::all(), &test_anchor())
        .expect("should sign input 0");
    tx.sign_input(1, &key, SighashType::all(), &test_anchor())
        .expect("should sign input 1");

    assert!(tx.inputs[0].unlocking_script.is_some());
    assert!(tx.inputs[1].unlocking_script.is_some());
    // The two digests differ (different outpoints), so the scripts do too.
    assert_ne!(
        tx.inputs[0].unlocking_script,
        tx.inputs[1].unlocking_script
    );
}

#[test]
fn test_sign_input_out_of_range() {
    let mut tx = build_scenario_tx();
    assert!(tx
        .sign_input(5, &test_key(), SighashType::all(), &test_anchor())
        .is_err());
}

/// SIGHASH_SINGLE on an input with no matching output surfaces the
/// out-of-range error instead of signing garbage.
#[test]
fn test_sign_single_without_matching_output() {
    let history = vec![
        SpendableOutput {
            tx_id: FUNDING_TXID.to_string(),
            output_index: 0,
            satoshis: 1000,
            address: recipient_address(),
        },
        SpendableOutput {
            tx_id: FUNDING_TXID.to_string(),
            output_index: 1,
            satoshis: 1000,
            address: recipient_address(),
        },
    ];
    let recipients = vec![Recipient {
        address: recipient_address(),
        satoshis: 1500,
    }];
    let mut tx =
        Transaction::from_utxos(&history, &recipients, &test_anchor()).expect("assemble");

    let result = tx.sign_input(1, &test_key(), SighashType::single(), &test_anchor());
    assert!(matches!(
        result,
        Err(TransactionError::SighashSingleOutOfRange { index: 1, outputs: 1 })
    ));
    // The failing input stays unsigned; the transaction remains inspectable.
    assert!(tx.inputs[1].unlocking_script.is_none());
}

/// Different sighash modes yield different signatures over the same input.
#[test]
fn test_sighash_modes_change_signature() {
    let mut all_tx = build_scenario_tx();
    let mut none_tx = build_scenario_tx();
    all_tx
        .sign_input(0, &test_key(), SighashType::all(), &test_anchor())
        .expect("should sign");
    none_tx
        .sign_input(0, &test_key(), SighashType::none(), &test_anchor())
        .expect("should sign");
    assert_ne!(
        all_tx.inputs[0].unlocking_script,
        none_tx.inputs[0].unlocking_script
    );
}
