//! Core transaction type.
//!
//! Represents a complete transaction with version, inputs, outputs, and
//! lock time. Supports binary and hex serialization, transaction ID
//! computation, assembly from spendable-output history and recipients,
//! and per-input signing with replay-protected P2PKH unlocking scripts.

use zrp_primitives::chainhash::Hash;
use zrp_primitives::ec::PrivateKey;
use zrp_primitives::hash::sha256d;
use zrp_primitives::util::{VarInt, WireReader, WireWriter};

use crate::input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::output::TransactionOutput;
use crate::sighash::SighashType;
use crate::template::{self, p2pkh_replay, ReplayAnchor, UnlockingScriptTemplate};
use crate::utxo::{Recipient, SpendableOutput};
use crate::TransactionError;

/// Cap on up-front Vec allocation while parsing. Counts are untrusted;
/// anything past this grows as elements actually decode.
const MAX_PREALLOC: u64 = 1024;

/// A transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
///
/// Input and output order is semantically significant: serialization
/// and signature digests both depend on it. Never reorder after
/// creation.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with version 1 and lock time 0.
    ///
    /// # Returns
    /// A `Transaction` with no inputs or outputs.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------

    /// Build an unsigned transaction from spendable outputs and recipients.
    ///
    /// Each history entry becomes an input with the default (finalized)
    /// sequence number and no unlocking script; each recipient becomes
    /// an output whose locking script is built by address-type dispatch,
    /// with replay-protected P2PKH scripts pinned to `anchor`.
    ///
    /// # Arguments
    /// * `history` - The spendable outputs to consume.
    /// * `recipients` - The destinations for the funds.
    /// * `anchor` - The replay-protection block reference for P2PKH outputs.
    ///
    /// # Returns
    /// An unsigned `Transaction`, or a `MalformedFunding` error if a
    /// txid or address cannot be parsed.
    pub fn from_utxos(
        history: &[SpendableOutput],
        recipients: &[Recipient],
        anchor: &ReplayAnchor,
    ) -> Result<Self, TransactionError> {
        let mut tx = Transaction::new();

        for utxo in history {
            let hash = Hash::from_hex(&utxo.tx_id).map_err(|e| {
                TransactionError::MalformedFunding(format!(
                    "bad txid '{}': {}",
                    utxo.tx_id, e
                ))
            })?;

            let mut input = TransactionInput::new();
            input.source_txid = *hash.as_bytes();
            input.source_tx_out_index = utxo.output_index;
            input.sequence_number = DEFAULT_SEQUENCE_NUMBER;
            tx.add_input(input);
        }

        for recipient in recipients {
            let locking_script =
                template::locking_script_for(&recipient.address, anchor).map_err(|e| {
                    TransactionError::MalformedFunding(format!(
                        "bad recipient address '{}': {}",
                        recipient.address, e
                    ))
                })?;
            tx.add_output(TransactionOutput {
                satoshis: recipient.satoshis,
                locking_script,
            });
        }

        Ok(tx)
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of the raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the hex is
    /// invalid or the bytes do not form a valid transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// This method requires the byte slice to contain exactly one complete
    /// transaction with no trailing data.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated, malformed, or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `WireReader`.
    ///
    /// Reads the version, input count, inputs, output count, outputs, and
    /// lock time in standard wire format.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of a serialized transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` on I/O or
    /// format errors.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading input count: {}", e))
        })?;

        let mut inputs = Vec::with_capacity(input_count.value().min(MAX_PREALLOC) as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading output count: {}", e))
        })?;

        let mut outputs = Vec::with_capacity(output_count.value().min(MAX_PREALLOC) as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw bytes.
    ///
    /// # Returns
    /// A `Vec<u8>` containing the standard wire-format bytes:
    /// version(4) + varint(n_in) + inputs + varint(n_out) + outputs + locktime(4).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize this transaction to a hex string.
    ///
    /// # Returns
    /// A lowercase hex-encoded string of the raw bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Compute the transaction ID (double SHA-256 of serialized bytes).
    ///
    /// The txid bytes are in internal (little-endian) order. To get the
    /// conventional display string, use `tx_id_hex()`.
    ///
    /// # Returns
    /// A 32-byte array containing the txid in internal byte order.
    pub fn tx_id(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// Compute the transaction ID as a human-readable hex string.
    ///
    /// The hex string is byte-reversed from the internal hash, following
    /// the convention where txids are displayed in big-endian order.
    ///
    /// # Returns
    /// A 64-character hex string of the txid.
    pub fn tx_id_hex(&self) -> String {
        let mut id = self.tx_id();
        id.reverse();
        hex::encode(id)
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Append a `TransactionInput` to this transaction.
    ///
    /// # Arguments
    /// * `input` - The input to add.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Return the number of inputs in the transaction.
    ///
    /// # Returns
    /// The input count.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Append a `TransactionOutput` to this transaction.
    ///
    /// # Arguments
    /// * `output` - The output to add.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Return the number of outputs in the transaction.
    ///
    /// # Returns
    /// The output count.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Compute the sum of all output satoshi values.
    ///
    /// # Returns
    /// The total satoshis across all outputs.
    pub fn total_output_satoshis(&self) -> u64 {
        self.outputs.iter().map(|o| o.satoshis).sum()
    }

    /// Return the size of this transaction in bytes.
    ///
    /// # Returns
    /// The byte length of the serialized transaction.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    // -----------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------

    /// Sign one input with a replay-protected P2PKH unlocking script.
    ///
    /// The signature commits to the current state of all unlocking
    /// scripts, so multi-input signing must proceed sequentially: sign
    /// input 0, then input 1, and so on, on the same transaction.
    /// Concurrent signing of the same transaction is not supported.
    ///
    /// # Arguments
    /// * `input_index` - The index of the input to sign.
    /// * `private_key` - The key controlling the output being spent.
    /// * `sighash` - The sighash type to sign with.
    /// * `anchor` - The replay anchor pinned into the spent output's script.
    ///
    /// # Returns
    /// `Ok(())` after setting the input's unlocking script, or an error
    /// if the index is out of range or signing fails.
    pub fn sign_input(
        &mut self,
        input_index: usize,
        private_key: &PrivateKey,
        sighash: SighashType,
        anchor: &ReplayAnchor,
    ) -> Result<(), TransactionError> {
        let unlocker = p2pkh_replay::unlock(private_key.clone(), Some(sighash), *anchor);
        let script = unlocker.sign(self, input_index)?;
        self.inputs[input_index].unlocking_script = Some(script);
        Ok(())
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
