//! ECDSA signature with script-style DER serialization.
//!
//! Signing uses RFC6979 deterministic nonces with low-S normalization.
//! DER encoding keeps R and S as fixed 32-byte big-endian values, each
//! prepended with a zero byte when the high bit is set so the integers
//! are not read as negative.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{self, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Length of the message digest accepted by the signing primitive.
const DIGEST_LEN: usize = 32;

/// An ECDSA signature with R and S components.
///
/// R and S are stored as fixed 32-byte big-endian values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The R component of the signature (32 bytes, big-endian).
    r: [u8; 32],
    /// The S component of the signature (32 bytes, big-endian).
    s: [u8; 32],
}

impl Signature {
    /// Create a signature from raw R and S 32-byte arrays.
    ///
    /// # Arguments
    /// * `r` - The R component (32 bytes, big-endian).
    /// * `s` - The S component (32 bytes, big-endian).
    ///
    /// # Returns
    /// A new `Signature` with the given R and S values.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// Access the R component of the signature.
    ///
    /// # Returns
    /// A reference to the 32-byte R value.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Access the S component of the signature.
    ///
    /// # Returns
    /// A reference to the 32-byte S value.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Sign a 32-byte message digest with the given private key.
    ///
    /// Uses RFC6979 deterministic nonces, so signing the same digest with
    /// the same key always yields the same signature. The S component is
    /// normalized to the lower half of the curve order per BIP-0062.
    ///
    /// # Arguments
    /// * `hash` - The 32-byte message digest to sign.
    /// * `priv_key` - The private key to sign with.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if the digest has the
    /// wrong length or the signing primitive rejects the inputs.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        if hash.len() != DIGEST_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LEN,
                hash.len()
            )));
        }

        let k256_sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        // Low-S normalization per BIP-0062.
        let k256_sig = k256_sig.normalize_s().unwrap_or(k256_sig);

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        Ok(Signature { r, s })
    }

    /// Serialize the signature in DER format.
    ///
    /// Output: `0x30 <len> 0x02 <r_len> <r_bytes> 0x02 <s_len> <s_bytes>`.
    /// R and S are the fixed 32-byte values, each prepended with `0x00`
    /// when the high bit of the first byte is set.
    ///
    /// # Returns
    /// A byte vector containing the DER-encoded signature.
    pub fn to_der(&self) -> Vec<u8> {
        let rb = pad_for_der(&self.r);
        let sb = pad_for_der(&self.s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(0x30);
        out.push((total_len - 2) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Parse a DER-encoded ECDSA signature.
    ///
    /// Expected format: `0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>`.
    /// Leading zero padding on R and S is stripped; the values are
    /// right-aligned into 32-byte arrays.
    ///
    /// # Arguments
    /// * `bytes` - DER-encoded signature bytes.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if the encoding is malformed.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < 8 {
            return Err(PrimitivesError::InvalidSignature(
                "malformed signature: too short".to_string(),
            ));
        }
        if bytes[0] != 0x30 {
            return Err(PrimitivesError::InvalidSignature(
                "malformed signature: no sequence tag".to_string(),
            ));
        }
        let seq_len = bytes[1] as usize;
        if seq_len + 2 != bytes.len() {
            return Err(PrimitivesError::InvalidSignature(
                "malformed signature: bad sequence length".to_string(),
            ));
        }

        let mut idx = 2;
        let r = read_der_integer(bytes, &mut idx)?;
        let s = read_der_integer(bytes, &mut idx)?;
        if idx != bytes.len() {
            return Err(PrimitivesError::InvalidSignature(
                "malformed signature: trailing bytes".to_string(),
            ));
        }

        Ok(Signature { r, s })
    }

    /// Verify this signature against a digest and a k256 verifying key
    /// (crate-internal).
    pub(crate) fn verify_with_key(&self, hash: &[u8], vk: &VerifyingKey) -> bool {
        let sig = match ecdsa::Signature::from_scalars(self.r, self.s) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        vk.verify_prehash(hash, &sig).is_ok()
    }

    /// Verify this signature against a digest and public key.
    ///
    /// # Arguments
    /// * `hash` - The message digest that was signed.
    /// * `pub_key` - The public key to verify against.
    ///
    /// # Returns
    /// `true` if the signature is valid.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        pub_key.verify(hash, self)
    }
}

/// Prepend a zero byte to a 32-byte big-endian integer when the high bit
/// is set, so DER readers do not interpret the value as negative.
fn pad_for_der(value: &[u8; 32]) -> Vec<u8> {
    if value[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(33);
        out.push(0x00);
        out.extend_from_slice(value);
        out
    } else {
        value.to_vec()
    }
}

/// Read one DER INTEGER at `*idx`, returning its value right-aligned in
/// a 32-byte array and advancing the index past it.
fn read_der_integer(bytes: &[u8], idx: &mut usize) -> Result<[u8; 32], PrimitivesError> {
    if *idx + 2 > bytes.len() || bytes[*idx] != 0x02 {
        return Err(PrimitivesError::InvalidSignature(
            "malformed signature: missing integer tag".to_string(),
        ));
    }
    let len = bytes[*idx + 1] as usize;
    *idx += 2;
    if len == 0 || *idx + len > bytes.len() {
        return Err(PrimitivesError::InvalidSignature(
            "malformed signature: bad integer length".to_string(),
        ));
    }
    let mut value = &bytes[*idx..*idx + len];
    *idx += len;

    // Strip leading zero padding.
    while value.len() > 1 && value[0] == 0x00 {
        value = &value[1..];
    }
    if value.len() > 32 {
        return Err(PrimitivesError::InvalidSignature(
            "malformed signature: integer too large".to_string(),
        ));
    }

    let mut out = [0u8; 32];
    out[32 - value.len()..].copy_from_slice(value);
    Ok(out)
}
