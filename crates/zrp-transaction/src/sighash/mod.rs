//! Signature hash computation for transaction signing.
//!
//! Computes the hash that is signed by ECDSA to authorize spending a
//! transaction input. The network uses the legacy (pre-segwit) sighash
//! algorithm: a modified copy of the transaction is serialized, the
//! 4-byte little-endian sighash code is appended, and the result is
//! double-SHA256 hashed. The modifications depend on the sighash mode
//! and determine which parts of the transaction the signature commits to.

use zrp_primitives::hash::sha256d;
use zrp_primitives::util::WireWriter;
use zrp_script::Script;

use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash modes
// -----------------------------------------------------------------------

/// Satoshi placeholder written into outputs blanked by SIGHASH_SINGLE.
/// Serializes as eight 0xFF bytes.
pub const SIGHASH_SINGLE_PLACEHOLDER: u64 = u64::MAX;

/// The base sighash mode, controlling output commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SighashBase {
    /// Commit to all outputs (the default).
    All = 0x01,
    /// Commit to no outputs; they may be changed after signing.
    None = 0x02,
    /// Commit only to the output at the same index as the signed input.
    Single = 0x03,
}

/// A complete sighash type: a base mode plus the optional
/// ANYONECANPAY bit (0x80), which drops the commitment to the other
/// inputs so further inputs can be added after signing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SighashType {
    /// The base mode (ALL, NONE, or SINGLE).
    pub base: SighashBase,
    /// Whether the ANYONECANPAY bit is set.
    pub anyone_can_pay: bool,
}

impl SighashType {
    /// SIGHASH_ALL: commit to every input and output.
    ///
    /// # Returns
    /// A `SighashType` with base ALL and no ANYONECANPAY.
    pub fn all() -> Self {
        SighashType {
            base: SighashBase::All,
            anyone_can_pay: false,
        }
    }

    /// SIGHASH_NONE: commit to the inputs only.
    ///
    /// # Returns
    /// A `SighashType` with base NONE and no ANYONECANPAY.
    pub fn none() -> Self {
        SighashType {
            base: SighashBase::None,
            anyone_can_pay: false,
        }
    }

    /// SIGHASH_SINGLE: commit to the one output matching the input index.
    ///
    /// # Returns
    /// A `SighashType` with base SINGLE and no ANYONECANPAY.
    pub fn single() -> Self {
        SighashType {
            base: SighashBase::Single,
            anyone_can_pay: false,
        }
    }

    /// Set the ANYONECANPAY bit on this sighash type.
    ///
    /// # Returns
    /// The same base mode with ANYONECANPAY enabled.
    pub fn anyone_can_pay(mut self) -> Self {
        self.anyone_can_pay = true;
        self
    }

    /// The numeric sighash code as used on the wire.
    ///
    /// # Returns
    /// The base value (0x01/0x02/0x03), OR'd with 0x80 when
    /// ANYONECANPAY is set.
    pub fn code(&self) -> u32 {
        let base = self.base as u32;
        if self.anyone_can_pay {
            base | 0x80
        } else {
            base
        }
    }
}

impl Default for SighashType {
    fn default() -> Self {
        Self::all()
    }
}

// -----------------------------------------------------------------------
// Preimage construction
// -----------------------------------------------------------------------

/// Build the sighash preimage transaction for an input.
///
/// Produces a deep copy of `tx` modified per the sighash rules; the
/// original transaction is never touched:
///
/// 1. Every input's unlocking script is cleared.
/// 2. The input at `input_index` gets `substitute_script` (the locking
///    script of the output it spends).
/// 3. NONE clears the outputs entirely.
/// 4. SINGLE truncates the outputs to `input_index + 1` and blanks
///    every retained output before the last one (placeholder satoshis,
///    empty script).
/// 5. ANYONECANPAY replaces the inputs with just the one being signed.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `substitute_script` - The script substituted into that input.
/// * `sighash` - The sighash type.
///
/// # Returns
/// The preimage transaction, or an error if `input_index` is out of
/// range, or SINGLE is requested with fewer outputs than `input_index + 1`.
pub fn preimage_transaction(
    tx: &Transaction,
    input_index: usize,
    substitute_script: &Script,
    sighash: SighashType,
) -> Result<Transaction, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    let mut preimage = tx.clone();

    for input in &mut preimage.inputs {
        input.unlocking_script = None;
    }
    preimage.inputs[input_index].unlocking_script = Some(substitute_script.clone());

    match sighash.base {
        SighashBase::All => {}
        SighashBase::None => {
            preimage.outputs.clear();
        }
        SighashBase::Single => {
            if input_index >= preimage.outputs.len() {
                return Err(TransactionError::SighashSingleOutOfRange {
                    index: input_index,
                    outputs: preimage.outputs.len(),
                });
            }
            preimage.outputs.truncate(input_index + 1);
            for output in &mut preimage.outputs[..input_index] {
                *output = TransactionOutput {
                    satoshis: SIGHASH_SINGLE_PLACEHOLDER,
                    locking_script: Script::new(),
                };
            }
        }
    }

    if sighash.anyone_can_pay {
        let signed_input = preimage.inputs[input_index].clone();
        preimage.inputs = vec![signed_input];
    }

    Ok(preimage)
}

/// Serialize the sighash preimage and append the 4-byte LE sighash code.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `substitute_script` - The script substituted into that input.
/// * `sighash` - The sighash type.
///
/// # Returns
/// The raw bytes that are double-hashed to produce the signing digest.
pub fn preimage_bytes(
    tx: &Transaction,
    input_index: usize,
    substitute_script: &Script,
    sighash: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    let preimage = preimage_transaction(tx, input_index, substitute_script, sighash)?;

    let mut writer = WireWriter::with_capacity(256);
    writer.write_bytes(&preimage.to_bytes());
    writer.write_u32_le(sighash.code());
    Ok(writer.into_bytes())
}

/// Compute the signing digest for an input.
///
/// Double-SHA256 of the serialized preimage plus sighash code.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `substitute_script` - The script substituted into that input.
/// * `sighash` - The sighash type.
///
/// # Returns
/// A 32-byte digest to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    substitute_script: &Script,
    sighash: SighashType,
) -> Result<[u8; 32], TransactionError> {
    let bytes = preimage_bytes(tx, input_index, substitute_script, sighash)?;
    Ok(sha256d(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TransactionInput;

    fn two_in_two_out() -> Transaction {
        let mut tx = Transaction::new();
        for i in 0..2u8 {
            let mut input = TransactionInput::new();
            input.source_txid = [i + 1; 32];
            input.source_tx_out_index = i as u32;
            input.unlocking_script = Some(Script::from_bytes(&[0x51]));
            tx.add_input(input);
        }
        for i in 0..2u8 {
            tx.add_output(TransactionOutput {
                satoshis: 1000 * (i as u64 + 1),
                locking_script: Script::from_bytes(&[0x52, i]),
            });
        }
        tx
    }

    #[test]
    fn test_sighash_codes() {
        assert_eq!(SighashType::all().code(), 0x01);
        assert_eq!(SighashType::none().code(), 0x02);
        assert_eq!(SighashType::single().code(), 0x03);
        assert_eq!(SighashType::all().anyone_can_pay().code(), 0x81);
        assert_eq!(SighashType::single().anyone_can_pay().code(), 0x83);
    }

    #[test]
    fn test_preimage_all_substitutes_script() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa, 0xbb]);
        let preimage = preimage_transaction(&tx, 1, &sub, SighashType::all())
            .expect("should build preimage");

        assert!(preimage.inputs[0].unlocking_script.is_none());
        assert_eq!(preimage.inputs[1].unlocking_script, Some(sub));
        assert_eq!(preimage.outputs, tx.outputs);
        // The original is untouched.
        assert!(tx.inputs[0].unlocking_script.is_some());
    }

    #[test]
    fn test_preimage_none_clears_outputs() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        let preimage = preimage_transaction(&tx, 0, &sub, SighashType::none())
            .expect("should build preimage");
        assert!(preimage.outputs.is_empty());
        assert_eq!(preimage.inputs.len(), 2);
    }

    #[test]
    fn test_preimage_single_truncates_and_blanks() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        let preimage = preimage_transaction(&tx, 1, &sub, SighashType::single())
            .expect("should build preimage");

        assert_eq!(preimage.outputs.len(), 2);
        assert_eq!(preimage.outputs[0].satoshis, SIGHASH_SINGLE_PLACEHOLDER);
        assert!(preimage.outputs[0].locking_script.is_empty());
        assert_eq!(preimage.outputs[1], tx.outputs[1]);
    }

    #[test]
    fn test_preimage_single_out_of_range() {
        let mut tx = two_in_two_out();
        tx.outputs.truncate(1);
        let sub = Script::from_bytes(&[0xaa]);
        let result = preimage_transaction(&tx, 1, &sub, SighashType::single());
        assert!(matches!(
            result,
            Err(TransactionError::SighashSingleOutOfRange {
                index: 1,
                outputs: 1
            })
        ));
    }

    #[test]
    fn test_preimage_anyone_can_pay_keeps_single_input() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        let preimage =
            preimage_transaction(&tx, 1, &sub, SighashType::all().anyone_can_pay())
                .expect("should build preimage");

        assert_eq!(preimage.inputs.len(), 1);
        assert_eq!(preimage.inputs[0].source_txid, tx.inputs[1].source_txid);
        assert_eq!(
            preimage.inputs[0].source_tx_out_index,
            tx.inputs[1].source_tx_out_index
        );
        assert_eq!(preimage.inputs[0].unlocking_script, Some(sub));
    }

    #[test]
    fn test_preimage_single_anyone_can_pay_composes() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        let preimage =
            preimage_transaction(&tx, 1, &sub, SighashType::single().anyone_can_pay())
                .expect("should build preimage");

        assert_eq!(preimage.inputs.len(), 1);
        assert_eq!(preimage.outputs.len(), 2);
        assert_eq!(preimage.outputs[0].satoshis, SIGHASH_SINGLE_PLACEHOLDER);
    }

    #[test]
    fn test_preimage_input_index_out_of_range() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        assert!(preimage_transaction(&tx, 2, &sub, SighashType::all()).is_err());
    }

    #[test]
    fn test_preimage_bytes_appends_code() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        let bytes = preimage_bytes(&tx, 0, &sub, SighashType::all())
            .expect("should serialize preimage");
        assert_eq!(&bytes[bytes.len() - 4..], &[0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_signature_hash_deterministic() {
        let tx = two_in_two_out();
        let sub = Script::from_bytes(&[0xaa]);
        let h1 = signature_hash(&tx, 0, &sub, SighashType::all()).expect("hash");
        let h2 = signature_hash(&tx, 0, &sub, SighashType::all()).expect("hash");
        assert_eq!(h1, h2);

        let h3 = signature_hash(&tx, 0, &sub, SighashType::none()).expect("hash");
        assert_ne!(h1, h3);
    }
}
