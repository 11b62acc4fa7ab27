//! Script opcode constants.
//!
//! Only the opcodes used by the standard locking and unlocking templates
//! are defined here. `OP_CHECKBLOCKATHEIGHT` is the replay-protection
//! opcode (BIP-115 style) that binds a spend to a block height and hash.

/// Push an empty byte vector onto the stack.
pub const OP_0: u8 = 0x00;

/// Direct push of 20 bytes (the length byte doubles as the opcode).
pub const OP_DATA_20: u8 = 0x14;

/// Direct push of 32 bytes.
pub const OP_DATA_32: u8 = 0x20;

/// Largest direct push (75 bytes). Longer data needs OP_PUSHDATA1.
pub const OP_DATA_75: u8 = 0x4b;

/// The next byte is the number of bytes to push (up to 255).
pub const OP_PUSHDATA1: u8 = 0x4c;

/// The next 2 bytes (LE) are the number of bytes to push.
pub const OP_PUSHDATA2: u8 = 0x4d;

/// The next 4 bytes (LE) are the number of bytes to push.
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;

/// Pop two items and push 1 if equal, else 0.
pub const OP_EQUAL: u8 = 0x87;

/// OP_EQUAL followed by OP_VERIFY (fail the script on mismatch).
pub const OP_EQUALVERIFY: u8 = 0x88;

/// Hash the top stack item with RIPEMD160(SHA256(x)).
pub const OP_HASH160: u8 = 0xa9;

/// Verify an ECDSA signature against a public key and the sighash digest.
pub const OP_CHECKSIG: u8 = 0xac;

/// Replay protection: verify that the block at the pushed height has the
/// pushed hash, invalidating the spend after a chain reorganization past
/// that point.
pub const OP_CHECKBLOCKATHEIGHT: u8 = 0xb4;
