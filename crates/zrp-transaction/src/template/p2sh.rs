//! Pay-to-Script-Hash locking script template.
//!
//! Produces the classic `OP_HASH160 <20-byte script hash> OP_EQUAL`
//! pattern. P2SH outputs carry no replay anchor; the pin, if any, lives
//! inside the redeem script hashed into the address. Redeem-script
//! construction and P2SH spending are out of scope here.

use zrp_script::opcodes::{OP_EQUAL, OP_HASH160};
use zrp_script::{Address, Script};

/// Build a P2SH locking script from an address.
///
/// # Arguments
/// * `address` - The destination address (its 20-byte payload is the script hash).
///
/// # Returns
/// The 23-byte locking script.
pub fn lock(address: &Address) -> Script {
    let mut bytes = Vec::with_capacity(23);
    bytes.push(OP_HASH160);
    bytes.push(20);
    bytes.extend_from_slice(&address.payload);
    bytes.push(OP_EQUAL);
    Script::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zrp_script::opcodes::OP_DATA_20;
    use zrp_script::Network;

    #[test]
    fn test_lock_script_layout() {
        let sh = [0x5au8; 20];
        let addr = Address::from_script_hash(&sh, Network::Mainnet);
        let script = lock(&addr);
        let b = script.to_bytes();

        assert_eq!(b.len(), 23);
        assert_eq!(b[0], OP_HASH160);
        assert_eq!(b[1], OP_DATA_20);
        assert_eq!(&b[2..22], &sh);
        assert_eq!(b[22], OP_EQUAL);
        assert!(script.is_p2sh());
    }
}
