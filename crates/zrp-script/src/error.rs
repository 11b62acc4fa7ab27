use zrp_primitives::PrimitivesError;

/// Error types for script and address operations.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The address string could not be decoded (bad characters, bad length).
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The decoded address payload has the wrong length.
    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    /// The Base58Check checksum did not match.
    #[error("address checksum failed")]
    ChecksumFailed,

    /// The address decodes but matches no supported script template.
    #[error("unsupported address type: {0}")]
    UnsupportedAddress(String),

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Push data exceeds the largest representable length (255 bytes).
    #[error("push data too large: {0} bytes")]
    PushDataTooLarge(usize),

    /// An underlying primitives error (forwarded from `zrp-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}
