//! Error types specific to card transport

/// Transport error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection error
    #[error("Failed to connect to device")]
    Connection,

    /// Transmission error
    #[error("Failed to transmit data")]
    Transmission,

    /// No card in the field
    #[error("No card present")]
    NoCard,

    /// Response did not fit the receive buffer
    #[error("Buffer too small")]
    BufferTooSmall,

    /// The link gave up waiting for the card
    #[error("Operation timed out")]
    Timeout,

    /// The adapter does not provide this operation
    #[error("Operation not supported by this transport: {0}")]
    Unsupported(&'static str),

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a general other error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }
}
