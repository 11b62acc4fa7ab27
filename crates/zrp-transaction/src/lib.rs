/// ZRP SDK - Transaction building, signing, and serialization.
///
/// Provides the Transaction type with inputs, outputs, sighash preimage
/// construction, replay-protected script templates, per-input ECDSA
/// signing, and binary/hex serialization.

pub mod transaction;
pub mod input;
pub mod output;
pub mod utxo;
pub mod sighash;
pub mod template;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use utxo::{Recipient, SpendableOutput};

#[cfg(test)]
mod tests;
