#![deny(missing_docs)]

//! ZRP SDK - Complete SDK.
//!
//! Re-exports all ZRP SDK components for convenient single-crate usage.

pub use zrp_primitives as primitives;
pub use zrp_script as script;
pub use zrp_transaction as transaction;
