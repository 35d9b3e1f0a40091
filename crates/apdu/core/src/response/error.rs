//! Error types specific to APDU responses

/// Error for APDU response processing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// Response too short to hold a status word
    #[error("Incomplete response: {0} bytes, a status word needs 2")]
    Incomplete(usize),

    /// Payload shorter than the structure it should carry
    #[error("Truncated payload: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum payload length
        expected: usize,
        /// Payload length received
        actual: usize,
    },
}
