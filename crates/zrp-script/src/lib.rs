/// ZRP SDK - Script bytes, opcode constants, and address handling.
///
/// Provides the Script type used for locking and unlocking scripts,
/// the opcode constants needed by the standard script templates
/// (including OP_CHECKBLOCKATHEIGHT), and Base58Check address
/// parsing/encoding with network version prefixes.

pub mod script;
pub mod opcodes;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, AddressKind, Network};
