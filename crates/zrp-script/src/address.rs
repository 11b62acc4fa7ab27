/// Address handling.
///
/// Supports replay-protected P2PKH and P2SH addresses with Base58Check
/// encoding and SHA-256d checksums. P2PKH addresses carry a two-byte
/// network version prefix ("zn…" mainnet, "zt…" testnet); P2SH addresses
/// carry the classic one-byte prefix ('3' mainnet, '2' testnet). The
/// leading display character is the address-type discriminant for the
/// whole system.

use std::fmt;

use zrp_primitives::base58;
use zrp_primitives::ec::PublicKey;
use zrp_primitives::PrimitivesError;

use crate::ScriptError;

/// Mainnet P2PKH version prefix (addresses starting with "zn").
const MAINNET_PUBKEY_HASH: [u8; 2] = [0x20, 0x89];
/// Testnet P2PKH version prefix (addresses starting with "zt").
const TESTNET_PUBKEY_HASH: [u8; 2] = [0x20, 0x98];
/// Mainnet P2SH version prefix (addresses starting with '3').
const MAINNET_SCRIPT_HASH: [u8; 1] = [0x05];
/// Testnet P2SH version prefix (addresses starting with '2').
const TESTNET_SCRIPT_HASH: [u8; 1] = [0xc4];

/// Length of the hash payload carried by every supported address.
const PAYLOAD_LEN: usize = 20;

/// Network type for address prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Mainnet.
    Mainnet,
    /// Testnet.
    Testnet,
}

/// The script template an address resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    /// Replay-protected pay-to-pubkey-hash.
    PubkeyHash,
    /// Pay-to-script-hash.
    ScriptHash,
}

impl AddressKind {
    /// Derive the address kind from the leading display character.
    ///
    /// Addresses beginning with '3' or '2' are P2SH; everything else is
    /// replay-protected P2PKH. Extending the system to new address types
    /// means extending this dispatch.
    ///
    /// # Arguments
    /// * `c` - The first character of the address string.
    ///
    /// # Returns
    /// The `AddressKind` for that leading character.
    pub fn from_leading_char(c: char) -> Self {
        match c {
            '3' | '2' => AddressKind::ScriptHash,
            _ => AddressKind::PubkeyHash,
        }
    }
}

/// A validated, decoded address.
///
/// Contains the 20-byte hash payload, the script kind derived from the
/// leading display character, and the network detected from the version
/// prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The script template this address resolves to.
    pub kind: AddressKind,
    /// The network this address belongs to.
    pub network: Network,
    /// The 20-byte hash payload (pubkey hash or script hash).
    pub payload: [u8; PAYLOAD_LEN],
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// Derives the kind from the leading character, decodes the string,
    /// validates the checksum, and matches the version prefix against
    /// the supported networks.
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    ///
    /// # Returns
    /// An `Address`, or an error if the string is invalid or the version
    /// prefix is not a supported address type.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let leading = addr
            .chars()
            .next()
            .ok_or_else(|| ScriptError::InvalidAddress("empty address".to_string()))?;
        let kind = AddressKind::from_leading_char(leading);

        let decoded = base58::check_decode(addr).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => ScriptError::ChecksumFailed,
            other => ScriptError::InvalidAddress(format!("'{}': {}", addr, other)),
        })?;

        let (version, payload_bytes) = match kind {
            AddressKind::PubkeyHash => {
                if decoded.len() != 2 + PAYLOAD_LEN {
                    return Err(ScriptError::InvalidAddressLength(addr.to_string()));
                }
                (&decoded[..2], &decoded[2..])
            }
            AddressKind::ScriptHash => {
                if decoded.len() != 1 + PAYLOAD_LEN {
                    return Err(ScriptError::InvalidAddressLength(addr.to_string()));
                }
                (&decoded[..1], &decoded[1..])
            }
        };

        let network = match (kind, version) {
            (AddressKind::PubkeyHash, v) if v == MAINNET_PUBKEY_HASH => Network::Mainnet,
            (AddressKind::PubkeyHash, v) if v == TESTNET_PUBKEY_HASH => Network::Testnet,
            (AddressKind::ScriptHash, v) if v == MAINNET_SCRIPT_HASH => Network::Mainnet,
            (AddressKind::ScriptHash, v) if v == TESTNET_SCRIPT_HASH => Network::Testnet,
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };

        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(payload_bytes);

        Ok(Address {
            address_string: addr.to_string(),
            kind,
            network,
            payload,
        })
    }

    /// Create a replay-protected P2PKH address from a 20-byte pubkey hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of the public key.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address` with the encoded Base58Check string.
    pub fn from_public_key_hash(hash: &[u8; PAYLOAD_LEN], network: Network) -> Self {
        let version: &[u8] = match network {
            Network::Mainnet => &MAINNET_PUBKEY_HASH,
            Network::Testnet => &TESTNET_PUBKEY_HASH,
        };
        Self::encode(AddressKind::PubkeyHash, version, hash, network)
    }

    /// Create a P2SH address from a 20-byte script hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of the redeem script.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address` with the encoded Base58Check string.
    pub fn from_script_hash(hash: &[u8; PAYLOAD_LEN], network: Network) -> Self {
        let version: &[u8] = match network {
            Network::Mainnet => &MAINNET_SCRIPT_HASH,
            Network::Testnet => &TESTNET_SCRIPT_HASH,
        };
        Self::encode(AddressKind::ScriptHash, version, hash, network)
    }

    /// Derive the replay-protected P2PKH address for a public key.
    ///
    /// Computes Hash160 of the compressed public key and encodes it with
    /// the network's P2PKH version prefix.
    ///
    /// # Arguments
    /// * `pub_key` - The public key.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address` for the public key.
    pub fn from_public_key(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&pub_key.hash160(), network)
    }

    fn encode(
        kind: AddressKind,
        version: &[u8],
        hash: &[u8; PAYLOAD_LEN],
        network: Network,
    ) -> Self {
        let mut data = Vec::with_capacity(version.len() + PAYLOAD_LEN);
        data.extend_from_slice(version);
        data.extend_from_slice(hash);
        let address_string = base58::check_encode(&data);

        Address {
            address_string,
            kind,
            network,
            payload: *hash,
        }
    }
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
