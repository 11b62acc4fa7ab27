/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an input index out of range).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An error occurred during input signing.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// A spendable-output or recipient record could not be used
    /// (bad txid hex, unparseable address).
    #[error("malformed funding data: {0}")]
    MalformedFunding(String),
    /// SIGHASH_SINGLE was requested for an input index with no matching output.
    #[error("sighash single: input index {index} out of range (tx has {outputs} outputs)")]
    SighashSingleOutOfRange {
        /// The input index being signed.
        index: usize,
        /// The number of outputs in the transaction.
        outputs: usize,
    },
    /// An underlying script or address error (forwarded from `zrp-script`).
    #[error("script error: {0}")]
    Script(#[from] zrp_script::ScriptError),
    /// An underlying primitives error (forwarded from `zrp-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] zrp_primitives::PrimitivesError),
}
