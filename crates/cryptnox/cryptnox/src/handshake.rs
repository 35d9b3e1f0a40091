//! Handshake progression and configuration

use std::fmt;

use bytes::Bytes;

use crate::constants::CRYPTNOX_AID;
use crate::crypto::NamedCurve;

/// Progress of a handshake
///
/// Moves strictly forward, one state per successful step, and drops to
/// [`HandshakeState::Failed`] on the first error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HandshakeState {
    /// Nothing sent yet
    #[default]
    Idle,
    /// Applet selected
    AppSelected,
    /// Card certificate received and parsed
    CertificateReceived,
    /// Secure channel opened and salt received
    ChannelOpened,
    /// Shared secret derived
    Authenticated,
    /// A step failed
    Failed,
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::AppSelected => "application selected",
            Self::CertificateReceived => "certificate received",
            Self::ChannelOpened => "channel opened",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
        })
    }
}

/// The four handshake steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeStep {
    /// SELECT the applet
    Select,
    /// GET CARD CERTIFICATE with a fresh challenge
    GetCertificate,
    /// OPEN SECURE CHANNEL with a fresh ephemeral key
    OpenSecureChannel,
    /// Local ECDH against the card's ephemeral key
    MutualAuthenticate,
}

impl HandshakeStep {
    /// All steps in execution order
    pub const ALL: [Self; 4] = [
        Self::Select,
        Self::GetCertificate,
        Self::OpenSecureChannel,
        Self::MutualAuthenticate,
    ];

    /// State the handshake must be in before this step runs
    pub const fn requires(self) -> HandshakeState {
        match self {
            Self::Select => HandshakeState::Idle,
            Self::GetCertificate => HandshakeState::AppSelected,
            Self::OpenSecureChannel => HandshakeState::CertificateReceived,
            Self::MutualAuthenticate => HandshakeState::ChannelOpened,
        }
    }

    /// State reached when this step succeeds
    pub const fn completes(self) -> HandshakeState {
        match self {
            Self::Select => HandshakeState::AppSelected,
            Self::GetCertificate => HandshakeState::CertificateReceived,
            Self::OpenSecureChannel => HandshakeState::ChannelOpened,
            Self::MutualAuthenticate => HandshakeState::Authenticated,
        }
    }
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Select => "SELECT",
            Self::GetCertificate => "GET CARD CERTIFICATE",
            Self::OpenSecureChannel => "OPEN SECURE CHANNEL",
            Self::MutualAuthenticate => "MUTUAL AUTHENTICATE",
        })
    }
}

/// Parameters of a handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Applet to select
    pub aid: Bytes,
    /// Curve for the ephemeral keys
    pub curve: NamedCurve,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            aid: Bytes::from_static(CRYPTNOX_AID),
            curve: NamedCurve::P256,
        }
    }
}

impl HandshakeConfig {
    /// Select a different applet
    pub fn with_aid(mut self, aid: impl Into<Bytes>) -> Self {
        self.aid = aid.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_chain_states() {
        let mut state = HandshakeState::Idle;
        for step in HandshakeStep::ALL {
            assert_eq!(step.requires(), state);
            state = step.completes();
        }
        assert_eq!(state, HandshakeState::Authenticated);
    }

    #[test]
    fn test_default_config() {
        let config = HandshakeConfig::default();
        assert_eq!(config.aid.as_ref(), &[0xA0, 0x00, 0x00, 0x10, 0x00, 0x01, 0x12]);
        assert_eq!(config.curve, NamedCurve::P256);

        let config = config.with_aid(vec![0xA0u8, 0x01]);
        assert_eq!(config.aid.as_ref(), &[0xA0, 0x01]);
    }
}
