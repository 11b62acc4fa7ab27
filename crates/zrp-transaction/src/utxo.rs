//! Caller-supplied funding records.
//!
//! `SpendableOutput` describes a previous output available to spend and
//! `Recipient` describes a destination for funds. Both are read-only
//! source data consumed once when assembling a transaction; neither is
//! owned by the resulting `Transaction`. UTXO discovery itself (querying
//! a node or indexer) is the caller's responsibility.

/// A previous transaction output available to spend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendableOutput {
    /// The txid of the funding transaction, as a display-order hex string.
    pub tx_id: String,

    /// Index of the output within the funding transaction.
    pub output_index: u32,

    /// The satoshi value of the output.
    pub satoshis: u64,

    /// The address the output is locked to.
    pub address: String,
}

/// A destination for funds in a new transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipient {
    /// The destination address.
    pub address: String,

    /// The satoshi value to send.
    pub satoshis: u64,
}
