//! Card certificate returned by GET CARD CERTIFICATE
//!
//! ```text
//! offset  0      'C' format tag
//! offset  1..9   card nonce
//! offset  9..74  card ephemeral public key, SEC1 uncompressed (0x04 || X || Y)
//! offset 74..    DER signature over bytes 0..74, 70 to 72 bytes
//! ```
//!
//! The signature is kept but not verified.

use bytes::Bytes;

use crate::constants::NONCE_LEN;
use crate::crypto::{PUBLIC_KEY_LEN, UNCOMPRESSED_POINT_LEN, UNCOMPRESSED_POINT_TAG};
use crate::error::{Error, Result};

/// Format tag opening every certificate
pub const CERTIFICATE_FORMAT_TAG: u8 = b'C';
/// Offset of the card nonce
pub const NONCE_OFFSET: usize = 1;
/// Offset of the ephemeral key's SEC1 prefix byte
pub const EPHEMERAL_KEY_OFFSET: usize = NONCE_OFFSET + NONCE_LEN;
/// First byte after the ephemeral key
pub const EPHEMERAL_KEY_END: usize = EPHEMERAL_KEY_OFFSET + UNCOMPRESSED_POINT_LEN;
/// Shortest DER encoding of a P-256 ECDSA signature the card emits
pub const MIN_SIGNATURE_LEN: usize = 70;
/// Longest DER encoding of a P-256 ECDSA signature
pub const MAX_SIGNATURE_LEN: usize = 72;
/// Shortest complete certificate
pub const MIN_CERTIFICATE_LEN: usize = EPHEMERAL_KEY_END + MIN_SIGNATURE_LEN;
/// Longest complete certificate
pub const MAX_CERTIFICATE_LEN: usize = EPHEMERAL_KEY_END + MAX_SIGNATURE_LEN;

/// Card ephemeral public key in both wire representations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralKey {
    trimmed: [u8; PUBLIC_KEY_LEN],
    full: [u8; UNCOMPRESSED_POINT_LEN],
}

impl EphemeralKey {
    /// `X || Y`, as fed to the key agreement
    pub const fn trimmed(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.trimmed
    }

    /// `0x04 || X || Y`, exactly as found in the certificate
    pub const fn full(&self) -> &[u8; UNCOMPRESSED_POINT_LEN] {
        &self.full
    }
}

/// Pull the card's ephemeral public key out of a certificate
///
/// Only the length is checked here: anything shorter than
/// [`EPHEMERAL_KEY_END`] bytes fails with [`Error::CertificateTooShort`]. The
/// byte at offset 9 is dropped from the trimmed form whatever its value.
pub fn extract_ephemeral_key(certificate: &[u8]) -> Result<EphemeralKey> {
    let full: [u8; UNCOMPRESSED_POINT_LEN] = certificate
        .get(EPHEMERAL_KEY_OFFSET..EPHEMERAL_KEY_END)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(Error::CertificateTooShort(certificate.len()))?;

    let mut trimmed = [0u8; PUBLIC_KEY_LEN];
    trimmed.copy_from_slice(&full[1..]);

    Ok(EphemeralKey { trimmed, full })
}

/// Parsed card certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    raw: Bytes,
    nonce: [u8; NONCE_LEN],
    ephemeral_key: EphemeralKey,
}

impl Certificate {
    /// Parse a certificate payload, status word already removed
    ///
    /// Checks the format tag, the SEC1 prefix of the key and that a signature
    /// follows the key.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let ephemeral_key = extract_ephemeral_key(data)?;

        if data[0] != CERTIFICATE_FORMAT_TAG {
            return Err(Error::InvalidCertificate("unexpected format tag"));
        }
        if ephemeral_key.full[0] != UNCOMPRESSED_POINT_TAG {
            return Err(Error::InvalidCertificate(
                "ephemeral key is not an uncompressed point",
            ));
        }
        if data.len() == EPHEMERAL_KEY_END {
            return Err(Error::InvalidCertificate("missing signature"));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[NONCE_OFFSET..EPHEMERAL_KEY_OFFSET]);

        Ok(Self {
            raw: Bytes::copy_from_slice(data),
            nonce,
            ephemeral_key,
        })
    }

    /// Nonce echoed by the card
    ///
    /// Not compared against the challenge that was sent.
    pub const fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Card ephemeral public key
    pub const fn ephemeral_key(&self) -> &EphemeralKey {
        &self.ephemeral_key
    }

    /// Bytes covered by the signature
    pub fn signed_data(&self) -> &[u8] {
        &self.raw[..EPHEMERAL_KEY_END]
    }

    /// DER-encoded signature
    pub fn signature(&self) -> &[u8] {
        &self.raw[EPHEMERAL_KEY_END..]
    }

    /// Certificate as received
    pub const fn as_bytes(&self) -> &Bytes {
        &self.raw
    }
}
