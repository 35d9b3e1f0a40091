//! Ephemeral ECDH over NIST P-256
//!
//! Public points travel on the wire as 64 bytes (`X || Y`) without the SEC1
//! `0x04` prefix; the prefix is added back before decoding.

use std::fmt;

use p256::{PublicKey, SecretKey, elliptic_curve::sec1::ToEncodedPoint};
use tracing::trace;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::entropy::EntropySource;
use crate::error::{Error, Result};

/// Length of a private scalar
pub const PRIVATE_KEY_LEN: usize = 32;
/// Length of a public point without the SEC1 prefix
pub const PUBLIC_KEY_LEN: usize = 64;
/// Length of a SEC1 uncompressed public point
pub const UNCOMPRESSED_POINT_LEN: usize = 65;
/// SEC1 tag of an uncompressed point
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;
/// Length of the ECDH shared secret (x-coordinate)
pub const SHARED_SECRET_LEN: usize = 32;

/// Candidate scalars drawn before key generation gives up
const MAX_KEYGEN_ATTEMPTS: usize = 16;

/// Curves supported for the key agreement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// NIST P-256 (secp256r1), the only curve the card accepts
    #[default]
    P256,
}

impl fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P256 => f.write_str("P-256"),
        }
    }
}

/// Ephemeral keypair generated for one handshake
#[derive(Clone)]
pub struct EphemeralKeypair {
    secret: SecretKey,
    public: [u8; PUBLIC_KEY_LEN],
}

impl EphemeralKeypair {
    fn from_secret(secret: SecretKey) -> Self {
        let point = secret.public_key().to_encoded_point(false);
        let mut public = [0u8; PUBLIC_KEY_LEN];
        // Uncompressed encoding of a valid key is always 65 bytes
        public.copy_from_slice(&point.as_bytes()[1..]);
        Self { secret, public }
    }

    /// Public point as `X || Y`
    pub const fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public
    }

    /// Public point in SEC1 uncompressed form
    pub fn public_key_uncompressed(&self) -> [u8; UNCOMPRESSED_POINT_LEN] {
        let mut full = [0u8; UNCOMPRESSED_POINT_LEN];
        full[0] = UNCOMPRESSED_POINT_TAG;
        full[1..].copy_from_slice(&self.public);
        full
    }

    /// Big-endian private scalar, wiped when the returned value is dropped
    pub fn private_key(&self) -> Zeroizing<[u8; PRIVATE_KEY_LEN]> {
        let mut scalar = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
        scalar.copy_from_slice(&self.secret.to_bytes());
        scalar
    }

    /// Diffie-Hellman with a peer's 64-byte public point
    pub fn diffie_hellman(&self, peer_public_key: &[u8; PUBLIC_KEY_LEN]) -> Result<SharedSecret> {
        let peer = decode_public_key(peer_public_key)?;
        Ok(agree(&self.secret, &peer))
    }
}

impl fmt::Debug for EphemeralKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKeypair")
            .field("public", &hex::encode(self.public))
            .finish_non_exhaustive()
    }
}

/// ECDH shared secret, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_LEN]);

impl SharedSecret {
    /// Raw secret bytes
    pub const fn as_bytes(&self) -> &[u8; SHARED_SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// Generate an ephemeral keypair on `curve` from `rng`
///
/// Candidate scalars are drawn from `rng` until one lies in `[1, n-1]`. An
/// entropy source that keeps producing out-of-range values yields
/// [`Error::KeyGeneration`].
pub fn generate_keypair<R: EntropySource + ?Sized>(
    curve: NamedCurve,
    rng: &mut R,
) -> Result<EphemeralKeypair> {
    match curve {
        NamedCurve::P256 => {
            let mut candidate = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
            for attempt in 1..=MAX_KEYGEN_ATTEMPTS {
                rng.fill_random(candidate.as_mut_slice());
                match SecretKey::from_slice(candidate.as_slice()) {
                    Ok(secret) => return Ok(EphemeralKeypair::from_secret(secret)),
                    Err(_) => trace!(attempt, "Rejected out-of-range scalar"),
                }
            }
            Err(Error::KeyGeneration(
                "entropy source produced no valid scalar",
            ))
        }
    }
}

/// Compute the ECDH shared secret from a peer's 64-byte point and our 32-byte scalar
pub fn compute_shared_secret(
    peer_public_key: &[u8; PUBLIC_KEY_LEN],
    own_private_key: &[u8; PRIVATE_KEY_LEN],
    curve: NamedCurve,
) -> Result<SharedSecret> {
    match curve {
        NamedCurve::P256 => {
            let peer = decode_public_key(peer_public_key)?;
            let secret = SecretKey::from_slice(own_private_key)
                .map_err(|_| Error::KeyAgreement("private scalar out of range"))?;
            Ok(agree(&secret, &peer))
        }
    }
}

fn decode_public_key(public_key: &[u8; PUBLIC_KEY_LEN]) -> Result<PublicKey> {
    let mut sec1 = [0u8; UNCOMPRESSED_POINT_LEN];
    sec1[0] = UNCOMPRESSED_POINT_TAG;
    sec1[1..].copy_from_slice(public_key);
    PublicKey::from_sec1_bytes(&sec1)
        .map_err(|_| Error::KeyAgreement("peer point is not on the curve"))
}

fn agree(secret: &SecretKey, peer: &PublicKey) -> SharedSecret {
    let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    let mut out = [0u8; SHARED_SECRET_LEN];
    out.copy_from_slice(shared.raw_secret_bytes());
    SharedSecret(out)
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng, rngs::StdRng};

    use super::*;

    // NIST CAVP KAS ECC CDH primitive, P-256, COUNT = 0
    const PEER_PUBLIC: &str = "700c48f77f56584c5cc632ca65640db91b6bacce3a4df6b42ce7cc838833d287\
                               db71e509e3fd9b060ddb20ba5c51dcc5948d46fbf640dfe0441782cab85fa4ac";
    const OWN_PRIVATE: &str = "7d7dc5f71eb29ddaf80d6214632eeae03d9058af1fb6d22ed80badb62bc1a534";
    const OWN_PUBLIC: &str = "ead218590119e8876b29146ff89ca61770c4edbbf97d38ce385ed281d8a6b230\
                              28af61281fd35e2fa7002523acc85a429cb06ee6648325389f59edfce1405141";
    const SHARED: &str = "46fc62106420ff012e54a434fbdd2d25ccc5852060561e68040dd7778997bd7b";

    /// Replays a fixed byte sequence, cycling when exhausted
    struct FixedBytes {
        bytes: Vec<u8>,
        position: usize,
    }

    impl FixedBytes {
        fn new(bytes: Vec<u8>) -> Self {
            Self { bytes, position: 0 }
        }
    }

    impl RngCore for FixedBytes {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for byte in dst {
                *byte = self.bytes[self.position % self.bytes.len()];
                self.position += 1;
            }
        }
    }

    fn array<const N: usize>(hex_str: &str) -> [u8; N] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_known_answer() {
        let secret = compute_shared_secret(
            &array(PEER_PUBLIC),
            &array(OWN_PRIVATE),
            NamedCurve::P256,
        )
        .unwrap();
        assert_eq!(hex::encode(secret.as_bytes()), SHARED);
    }

    #[test]
    fn test_generate_from_fixed_entropy() {
        let mut rng = FixedBytes::new(hex::decode(OWN_PRIVATE).unwrap());
        let keypair = generate_keypair(NamedCurve::P256, &mut rng).unwrap();

        assert_eq!(hex::encode(keypair.public_key()), OWN_PUBLIC);
        assert_eq!(hex::encode(*keypair.private_key()), OWN_PRIVATE);
        assert_eq!(keypair.public_key_uncompressed()[0], UNCOMPRESSED_POINT_TAG);
        assert_eq!(&keypair.public_key_uncompressed()[1..], keypair.public_key());
    }

    #[test]
    fn test_agreement_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        let alice = generate_keypair(NamedCurve::P256, &mut rng).unwrap();
        let bob = generate_keypair(NamedCurve::P256, &mut rng).unwrap();
        assert_ne!(alice.public_key(), bob.public_key());

        let ab = compute_shared_secret(bob.public_key(), &alice.private_key(), NamedCurve::P256)
            .unwrap();
        let ba = compute_shared_secret(alice.public_key(), &bob.private_key(), NamedCurve::P256)
            .unwrap();
        assert_eq!(ab, ba);
        assert_eq!(alice.diffie_hellman(bob.public_key()).unwrap(), ab);
    }

    #[test]
    fn test_agreement_matches_p256_crate() {
        let mut rng = StdRng::seed_from_u64(11);
        let ours = generate_keypair(NamedCurve::P256, &mut rng).unwrap();

        let secret = SecretKey::from_slice(ours.private_key().as_slice()).unwrap();
        let decoded = PublicKey::from_sec1_bytes(&ours.public_key_uncompressed()).unwrap();
        assert_eq!(secret.public_key(), decoded);

        let peer = SecretKey::from_slice(&array::<32>(OWN_PRIVATE)).unwrap();
        let expected = p256::ecdh::diffie_hellman(peer.to_nonzero_scalar(), decoded.as_affine());
        let actual = compute_shared_secret(ours.public_key(), &array(OWN_PRIVATE), NamedCurve::P256)
            .unwrap();
        assert_eq!(actual.as_bytes().as_slice(), expected.raw_secret_bytes().as_slice());
    }

    #[test]
    fn test_out_of_range_scalars_are_rejected() {
        // Zero and values >= n are not valid scalars
        for fill in [0x00u8, 0xFF] {
            let mut rng = FixedBytes::new(vec![fill]);
            assert_eq!(
                generate_keypair(NamedCurve::P256, &mut rng).unwrap_err(),
                Error::KeyGeneration("entropy source produced no valid scalar")
            );
        }
    }

    #[test]
    fn test_invalid_peer_point() {
        let own = array::<32>(OWN_PRIVATE);

        // The identity has no uncompressed encoding
        assert_eq!(
            compute_shared_secret(&[0u8; 64], &own, NamedCurve::P256).unwrap_err(),
            Error::KeyAgreement("peer point is not on the curve")
        );

        let mut off_curve = array::<64>(PEER_PUBLIC);
        off_curve[63] ^= 0x01;
        assert!(matches!(
            compute_shared_secret(&off_curve, &own, NamedCurve::P256),
            Err(Error::KeyAgreement(_))
        ));
    }

    #[test]
    fn test_invalid_private_scalar() {
        assert_eq!(
            compute_shared_secret(&array(PEER_PUBLIC), &[0u8; 32], NamedCurve::P256).unwrap_err(),
            Error::KeyAgreement("private scalar out of range")
        );
    }

    #[test]
    fn test_secrets_are_redacted() {
        let keypair = generate_keypair(NamedCurve::P256, &mut StdRng::seed_from_u64(1)).unwrap();
        let debug = format!("{keypair:?}");
        assert!(!debug.contains(&hex::encode(*keypair.private_key())));
        assert_eq!(
            format!("{:?}", keypair.diffie_hellman(&array(PEER_PUBLIC)).unwrap()),
            "SharedSecret(..)"
        );
    }
}
