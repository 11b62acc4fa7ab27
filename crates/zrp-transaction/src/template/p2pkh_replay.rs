//! Replay-protected Pay-to-Public-Key-Hash script template.
//!
//! Locking scripts extend the classic P2PKH pattern with a block
//! height/hash pin: `OP_DUP OP_HASH160 <hash160> OP_EQUALVERIFY
//! OP_CHECKSIG <block hash> <height> OP_CHECKBLOCKATHEIGHT`. Unlocking
//! scripts are the usual `<sig> <pubkey>` pair.

use zrp_primitives::ec::PrivateKey;
use zrp_script::opcodes::OP_CHECKBLOCKATHEIGHT;
use zrp_script::{Address, Script};

use crate::sighash::{self, SighashType};
use crate::template::{ReplayAnchor, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Encode a block height as minimal little-endian bytes for a script push.
///
/// Trailing zero bytes are stripped, keeping at least one byte. A spend
/// pinned to height 0 pushes the single byte 0x00.
///
/// # Arguments
/// * `height` - The block height.
///
/// # Returns
/// The minimal little-endian encoding (1 to 4 bytes).
pub(crate) fn minimal_height_bytes(height: u32) -> Vec<u8> {
    let mut bytes = height.to_le_bytes().to_vec();
    while bytes.len() > 1 && bytes[bytes.len() - 1] == 0 {
        bytes.pop();
    }
    bytes
}

/// Build a replay-protected P2PKH locking script from a 20-byte pubkey hash.
///
/// The block hash is pushed in internal byte order, reversed from its
/// display form.
///
/// # Arguments
/// * `pubkey_hash` - The hash160 of the recipient's public key.
/// * `anchor` - The replay-protection block reference.
///
/// # Returns
/// The locking script, or an error if a push fails.
pub fn lock_hash(
    pubkey_hash: &[u8; 20],
    anchor: &ReplayAnchor,
) -> Result<Script, TransactionError> {
    use zrp_script::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};

    let mut script = Script::new();
    script.append_opcode(OP_DUP);
    script.append_opcode(OP_HASH160);
    script.append_push_data(pubkey_hash)?;
    script.append_opcode(OP_EQUALVERIFY);
    script.append_opcode(OP_CHECKSIG);
    script.append_push_data(anchor.hash.as_bytes())?;
    script.append_push_data(&minimal_height_bytes(anchor.height))?;
    script.append_opcode(OP_CHECKBLOCKATHEIGHT);
    Ok(script)
}

/// Build a replay-protected P2PKH locking script from an address.
///
/// # Arguments
/// * `address` - The destination address (its 20-byte payload is the pubkey hash).
/// * `anchor` - The replay-protection block reference.
///
/// # Returns
/// The locking script, or an error if a push fails.
pub fn lock(address: &Address, anchor: &ReplayAnchor) -> Result<Script, TransactionError> {
    lock_hash(&address.payload, anchor)
}

/// Create a replay-protected P2PKH unlocker for signing transaction inputs.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `sighash` - The sighash type. Defaults to ALL when `None`.
/// * `anchor` - The replay-protection block reference of the output being spent.
///
/// # Returns
/// A `P2pkhReplay` instance implementing `UnlockingScriptTemplate`.
pub fn unlock(
    private_key: PrivateKey,
    sighash: Option<SighashType>,
    anchor: ReplayAnchor,
) -> P2pkhReplay {
    P2pkhReplay {
        private_key,
        sighash: sighash.unwrap_or_default(),
        anchor,
    }
}

/// Replay-protected P2PKH signing template.
///
/// Holds the private key, the sighash type, and the replay anchor of
/// the output being spent. Produces unlocking scripts of the form
/// `<DER_signature + sighash_byte> <compressed_pubkey>`.
pub struct P2pkhReplay {
    /// The private key used for ECDSA signing.
    private_key: PrivateKey,

    /// The sighash type to sign with.
    sighash: SighashType,

    /// The replay anchor pinned into the locking script being satisfied.
    anchor: ReplayAnchor,
}

impl UnlockingScriptTemplate for P2pkhReplay {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// Rebuilds the replay-protected locking script for the signer's own
    /// public key hash, substitutes it into the sighash preimage, signs
    /// the resulting digest with RFC6979 deterministic ECDSA, and
    /// constructs `<DER_sig || sighash_byte> <compressed_pubkey>`.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input to sign.
    ///
    /// # Returns
    /// `Ok(Script)` containing the unlocking script.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            )));
        }

        // The input signs as if already unlocked by its own locking script.
        let pub_key = self.private_key.pub_key();
        let script_code = lock_hash(&pub_key.hash160(), &self.anchor)?;

        let digest = sighash::signature_hash(tx, input_index, &script_code, self.sighash)?;

        let signature = self
            .private_key
            .sign(&digest)
            .map_err(|e| TransactionError::SigningError(e.to_string()))?;

        let der_sig = signature.to_der();
        let mut sig_buf = Vec::with_capacity(der_sig.len() + 1);
        sig_buf.extend_from_slice(&der_sig);
        sig_buf.push(self.sighash.code() as u8);

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key.to_compressed())?;

        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zrp_primitives::chainhash::Hash;
    use zrp_script::opcodes::*;
    use zrp_script::Network;

    fn anchor() -> ReplayAnchor {
        let hash = Hash::from_hex(
            "0000000012345678000000000000000000000000000000000000000000000000",
        )
        .expect("valid hash");
        ReplayAnchor::new(142, hash)
    }

    #[test]
    fn test_minimal_height_bytes() {
        assert_eq!(minimal_height_bytes(0), vec![0x00]);
        assert_eq!(minimal_height_bytes(1), vec![0x01]);
        assert_eq!(minimal_height_bytes(0xff), vec![0xff]);
        assert_eq!(minimal_height_bytes(0x0100), vec![0x00, 0x01]);
        assert_eq!(minimal_height_bytes(500_000), vec![0x20, 0xa1, 0x07]);
        assert_eq!(
            minimal_height_bytes(0x0102_0304),
            vec![0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_lock_script_layout() {
        let pkh = [0x42u8; 20];
        let script = lock_hash(&pkh, &anchor()).expect("should build");
        let b = script.to_bytes();

        assert_eq!(b[0], OP_DUP);
        assert_eq!(b[1], OP_HASH160);
        assert_eq!(b[2], OP_DATA_20);
        assert_eq!(&b[3..23], &pkh);
        assert_eq!(b[23], OP_EQUALVERIFY);
        assert_eq!(b[24], OP_CHECKSIG);
        assert_eq!(b[25], OP_DATA_32);
        // The block hash sits in the script reversed from its display hex.
        assert_eq!(&b[26..58], anchor().hash.as_bytes());
        assert_eq!(b[58], 1);
        assert_eq!(b[59], 142);
        assert_eq!(b[60], OP_CHECKBLOCKATHEIGHT);
        assert_eq!(b.len(), 61);
        assert!(script.is_p2pkh_replay());
    }

    #[test]
    fn test_lock_matches_address_payload() {
        let pkh = [0x09u8; 20];
        let addr = Address::from_public_key_hash(&pkh, Network::Mainnet);
        let from_addr = lock(&addr, &anchor()).expect("should build");
        let from_hash = lock_hash(&pkh, &anchor()).expect("should build");
        assert_eq!(from_addr, from_hash);
    }
}
