//! PC/SC transport implementation

use std::{ffi::CString, fmt};

use bytes::Bytes;
use cryptnox_apdu_core::prelude::*;
use pcsc::{Card, Context, Disposition};
use tracing::{debug, warn};

use crate::{config::PcscConfig, error::PcscError, util::is_storage_tag_atr};

/// PC/SC pseudo-APDU asking the reader for the UID of the tag in the field
const GET_UID_COMMAND: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// Transport implementation using PC/SC
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, if established
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Create a new PC/SC transport for the specified reader
    pub(crate) fn new(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let mut transport = Self {
            context,
            card: None,
            reader_name: reader_name.to_string(),
            config,
        };

        // A missing card is fine here; presence is checked per handshake
        if let Err(e) = transport.connect_card() {
            debug!(reader = %transport.reader_name, error = %e, "No card connected yet");
        }

        Ok(transport)
    }

    /// Try to connect to the card
    fn connect_card(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let reader_cstr = CString::new(self.reader_name.clone())
            .map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))?;

        match self.context.connect(
            &reader_cstr,
            self.config.share_mode.into(),
            self.config.protocols,
        ) {
            Ok(card) => {
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the ATR of the current card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        self.card.as_ref().map_or_else(
            || Err(PcscError::NoCard(self.reader_name.clone())),
            |card| {
                card.get_attribute_owned(pcsc::Attribute::AtrString)
                    .map_err(Into::into)
            },
        )
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Check if the transport holds a card connection
    pub const fn has_card(&self) -> bool {
        self.card.is_some()
    }

    /// Transmit a command to the card
    ///
    /// A card reset is followed by at most [`MAX_RESET_RETRIES`] retransmissions.
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        let mut retries = 0;

        loop {
            self.connect_card()?;

            let card = self
                .card
                .as_mut()
                .ok_or_else(|| PcscError::NoCard(self.reader_name.clone()))?;

            let mut response_buffer = [0u8; pcsc::MAX_BUFFER_SIZE];

            let error = match card.transmit(command, &mut response_buffer) {
                Ok(response) => return Ok(Bytes::copy_from_slice(response)),
                Err(e) => e,
            };

            // If card was reset or removed, clear our reference
            if matches!(error, pcsc::Error::ResetCard | pcsc::Error::RemovedCard) {
                self.card = None;
            }

            if !should_retransmit(error, self.config.auto_reconnect, retries) {
                return Err(error.into());
            }

            retries += 1;
            warn!(reader = %self.reader_name, "Card was reset, retransmitting");
        }
    }
}

/// Retransmissions allowed after the card reports a reset
const MAX_RESET_RETRIES: usize = 1;

/// Whether a failed transmit is worth repeating
fn should_retransmit(error: pcsc::Error, auto_reconnect: bool, retries: usize) -> bool {
    auto_reconnect && error == pcsc::Error::ResetCard && retries < MAX_RESET_RETRIES
}

impl CardTransport for PcscTransport {
    fn do_exchange(&mut self, command: &[u8], _max_response_len: usize) -> Result<Bytes, TransportError> {
        self.transmit_command(command).map_err(TransportError::from)
    }

    fn is_card_present(&mut self) -> bool {
        if self.connect_card().is_err() {
            return false;
        }

        match self.atr() {
            Ok(atr) if is_storage_tag_atr(&atr) => {
                debug!(atr = %hex::encode(&atr), "Storage tag in the field, no APDU support");
                false
            }
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Could not read ATR, dropping stale connection");
                self.card = None;
                false
            }
        }
    }

    fn read_uid(&mut self) -> Result<Bytes, TransportError> {
        let response = self.transmit_command(&GET_UID_COMMAND)?;
        let response = Response::from_bytes(&response)
            .map_err(|e| TransportError::other(e.to_string()))?;

        if response.is_success() {
            Ok(response.into_payload())
        } else {
            Err(TransportError::other(format!(
                "UID read failed: {} ({})",
                response.status(),
                response.status().description()
            )))
        }
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
