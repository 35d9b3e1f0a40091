//! Material produced by a successful handshake

use crate::certificate::{Certificate, EphemeralKey};
use crate::constants::{NONCE_LEN, SALT_LEN};
use crate::crypto::{EphemeralKeypair, SharedSecret};

/// Result of one complete handshake
///
/// A new session is built for every attempt; nothing carries over between
/// handshakes. The shared secret and the client private key are wiped when the
/// session is dropped.
#[derive(Debug, Clone)]
pub struct Session {
    client_keypair: EphemeralKeypair,
    certificate: Certificate,
    sent_nonce: [u8; NONCE_LEN],
    salt: [u8; SALT_LEN],
    shared_secret: SharedSecret,
}

impl Session {
    pub(crate) fn new(
        client_keypair: EphemeralKeypair,
        certificate: Certificate,
        sent_nonce: [u8; NONCE_LEN],
        salt: [u8; SALT_LEN],
        shared_secret: SharedSecret,
    ) -> Self {
        Self {
            client_keypair,
            certificate,
            sent_nonce,
            salt,
            shared_secret,
        }
    }

    /// Ephemeral keypair generated for this session
    pub const fn client_keypair(&self) -> &EphemeralKeypair {
        &self.client_keypair
    }

    /// Certificate returned by the card
    pub const fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Card ephemeral public key taken from the certificate
    pub const fn card_ephemeral_key(&self) -> &EphemeralKey {
        self.certificate.ephemeral_key()
    }

    /// Challenge sent with GET CARD CERTIFICATE
    pub const fn sent_nonce(&self) -> &[u8; NONCE_LEN] {
        &self.sent_nonce
    }

    /// Salt returned by OPEN SECURE CHANNEL
    pub const fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// ECDH shared secret
    pub const fn shared_secret(&self) -> &SharedSecret {
        &self.shared_secret
    }
}
