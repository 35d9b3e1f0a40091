use cryptnox_apdu_core::{CommandError, ResponseError, StatusWord, TransportError};

use crate::handshake::{HandshakeState, HandshakeStep};

/// Result type for Cryptnox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cryptnox operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Command could not be encoded
    #[error(transparent)]
    Encoding(#[from] CommandError),

    /// Link failure, or no card in the field
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response too short for the status word or for the expected payload
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] ResponseError),

    /// Card answered with an unexpected status word
    #[error("Unexpected status word {actual} ({}), expected {expected}", actual.description())]
    StatusMismatch {
        /// Status word required by the step
        expected: StatusWord,
        /// Status word returned by the card
        actual: StatusWord,
    },

    /// Response has the right status but the wrong size
    #[error("Unexpected response length: expected {expected} bytes, got {actual}")]
    UnexpectedLength {
        /// Required length, status word included
        expected: usize,
        /// Length received
        actual: usize,
    },

    /// Certificate ends before the ephemeral key does
    #[error("Certificate too short: {0} bytes, the ephemeral key ends at byte 74")]
    CertificateTooShort(usize),

    /// Certificate layout is not the one the card emits
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(&'static str),

    /// No ephemeral key could be produced
    #[error("Key generation failed: {0}")]
    KeyGeneration(&'static str),

    /// Peer point or own scalar rejected by the curve
    #[error("Key agreement failed: {0}")]
    KeyAgreement(&'static str),
}

/// Failure of a handshake, tagged with the step that failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Handshake failed during {step} (last state: {reached}): {source}")]
pub struct HandshakeError {
    /// Step that failed
    pub step: HandshakeStep,
    /// Last state reached before the failure
    pub reached: HandshakeState,
    /// Underlying failure
    pub source: Error,
}

impl HandshakeError {
    /// Whether the failure came from the link rather than from the card's answer
    pub const fn is_transport(&self) -> bool {
        matches!(self.source, Error::Transport(_))
    }
}

impl From<HandshakeError> for Error {
    fn from(e: HandshakeError) -> Self {
        e.source
    }
}
