/// ZRP SDK - Cryptographic primitives, hashing, and wire codec.
///
/// This crate provides the foundational building blocks for the ZRP SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction and block identification
/// - Elliptic curve cryptography (secp256k1 keys and ECDSA signatures)
/// - Variable-length integer encoding and wire reader/writer
/// - Base58Check encoding/decoding

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
