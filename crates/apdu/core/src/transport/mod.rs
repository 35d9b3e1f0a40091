//! Transport capability for APDU communication with cards
//!
//! A transport sends a command buffer and returns the response buffer. It has no
//! knowledge of command structure or of the protocol running on top of it. Each
//! physical link (PC/SC reader, NFC front-end, serial bridge) gets its own adapter
//! implementing [`CardTransport`]; protocol code is generic over the trait and
//! never branches on the kind of link.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Blocking request/response channel to a card
pub trait CardTransport: fmt::Debug {
    /// Send `command` and return the response, status word included
    ///
    /// The response is truncated to at most `max_response_len` bytes. Waiting for
    /// the card is bounded by the adapter; a timeout surfaces as an error.
    fn exchange(&mut self, command: &[u8], max_response_len: usize) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode(command), max_response_len, "Transmitting command");
        match self.do_exchange(command, max_response_len) {
            Ok(mut response) => {
                response.truncate(max_response_len);
                trace!(response = %hex::encode(&response), "Received response");
                Ok(response)
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during exchange");
                Err(e)
            }
        }
    }

    /// Adapter-specific exchange, called by [`CardTransport::exchange`]
    fn do_exchange(&mut self, command: &[u8], max_response_len: usize) -> Result<Bytes, TransportError>;

    /// Whether an APDU-capable card is currently in the field
    fn is_card_present(&mut self) -> bool;

    /// Read the UID of whatever tag is present, for cards that cannot run APDUs
    fn read_uid(&mut self) -> Result<Bytes, TransportError> {
        Err(TransportError::Unsupported("UID read"))
    }
}

impl<T: CardTransport + ?Sized> CardTransport for &mut T {
    fn exchange(&mut self, command: &[u8], max_response_len: usize) -> Result<Bytes, TransportError> {
        (**self).exchange(command, max_response_len)
    }

    fn do_exchange(&mut self, command: &[u8], max_response_len: usize) -> Result<Bytes, TransportError> {
        (**self).do_exchange(command, max_response_len)
    }

    fn is_card_present(&mut self) -> bool {
        (**self).is_card_present()
    }

    fn read_uid(&mut self) -> Result<Bytes, TransportError> {
        (**self).read_uid()
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    /// Mock responses to return, in order
    pub(crate) responses: Vec<Bytes>,
    /// Commands that were sent
    pub(crate) commands: Vec<Bytes>,
}

#[cfg(test)]
impl MockTransport {
    pub(crate) fn new(responses: Vec<Bytes>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
        }
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_exchange(&mut self, command: &[u8], _max_response_len: usize) -> Result<Bytes, TransportError> {
        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::Transmission);
        }
        Ok(self.responses.remove(0))
    }

    fn is_card_present(&mut self) -> bool {
        !self.responses.is_empty()
    }
}
