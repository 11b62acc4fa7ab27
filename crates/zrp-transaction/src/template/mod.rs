//! Script templates for the supported address types.
//!
//! Provides locking-script construction for replay-protected P2PKH and
//! P2SH outputs, the `UnlockingScriptTemplate` trait for signing
//! strategies, and the `ReplayAnchor` carrying the block height/hash
//! that replay-protected scripts pin to.

pub mod p2pkh_replay;
pub mod p2sh;

use zrp_primitives::chainhash::Hash;
use zrp_script::{Address, AddressKind, Script};

use crate::transaction::Transaction;
use crate::TransactionError;

/// The block reference pinned into replay-protected locking scripts.
///
/// A spend is only valid while the block at `height` still has `hash`
/// in the canonical chain. The caller resolves a recent block and must
/// refresh it periodically; a stale anchor risks script invalidation
/// once the referenced block falls far behind the chain tip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayAnchor {
    /// The pinned block height.
    pub height: u32,
    /// The pinned block hash.
    pub hash: Hash,
}

impl ReplayAnchor {
    /// Create a new anchor from a height and block hash.
    ///
    /// # Arguments
    /// * `height` - The pinned block height.
    /// * `hash` - The pinned block hash.
    ///
    /// # Returns
    /// A new `ReplayAnchor`.
    pub fn new(height: u32, hash: Hash) -> Self {
        ReplayAnchor { height, hash }
    }
}

/// Trait for script templates that produce unlocking scripts.
///
/// Any signing strategy should implement this trait. The `sign` method
/// receives the full transaction and the input index, computes the
/// appropriate signature hash, signs it, and returns the unlocking script.
pub trait UnlockingScriptTemplate {
    /// Produce an unlocking script for the given input.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input to sign.
    ///
    /// # Returns
    /// `Ok(Script)` containing the unlocking script, or an error on failure.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError>;
}

/// Build the locking script for an address.
///
/// Dispatches on the address kind derived from its leading display
/// character: '3' and '2' produce a P2SH script, everything else a
/// replay-protected P2PKH script pinned to `anchor`. This is the
/// address-type discriminant for the whole system; new address types
/// extend this dispatch.
///
/// # Arguments
/// * `address` - The Base58Check address string.
/// * `anchor` - The replay-protection block reference.
///
/// # Returns
/// The locking script, or an error if the address is invalid.
pub fn locking_script_for(
    address: &str,
    anchor: &ReplayAnchor,
) -> Result<Script, TransactionError> {
    let addr = Address::from_string(address)?;
    match addr.kind {
        AddressKind::PubkeyHash => p2pkh_replay::lock(&addr, anchor),
        AddressKind::ScriptHash => Ok(p2sh::lock(&addr)),
    }
}
