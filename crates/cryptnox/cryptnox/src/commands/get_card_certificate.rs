use cryptnox_apdu_core::prelude::*;

use crate::certificate::{Certificate, MAX_CERTIFICATE_LEN, MIN_CERTIFICATE_LEN};
use crate::constants::{
    CERTIFICATE_RESPONSE_LEN, CLA_PROPRIETARY, INS_GET_CARD_CERTIFICATE, NONCE_LEN,
};
use crate::error::{Error, Result};

/// GET CARD CERTIFICATE with a client challenge
#[derive(Debug, Clone, Copy)]
pub struct GetCardCertificateCommand;

impl GetCardCertificateCommand {
    /// Receive buffer size for the response
    pub const MAX_RESPONSE_LEN: usize = CERTIFICATE_RESPONSE_LEN;

    /// Build the command carrying `nonce`
    pub fn with_nonce(nonce: &[u8; NONCE_LEN]) -> Result<Command> {
        Ok(Command::new(
            CLA_PROPRIETARY,
            INS_GET_CARD_CERTIFICATE,
            0x00,
            0x00,
            Bytes::copy_from_slice(nonce),
        )?)
    }

    /// Check the answer and parse the certificate
    ///
    /// A bare status word other than `90 00` is a [`Error::StatusMismatch`].
    /// Anything too short to hold a certificate is malformed, since its last
    /// two bytes cannot be trusted as a status word.
    pub fn parse_response(response: &[u8]) -> Result<Certificate> {
        let (actual, payload) = utils::extract_status_and_payload(response)?;
        let expected = status::SUCCESS;

        if payload.is_empty() && actual != expected {
            return Err(Error::StatusMismatch { expected, actual });
        }
        if payload.len() < MIN_CERTIFICATE_LEN {
            return Err(ResponseError::Truncated {
                expected: MIN_CERTIFICATE_LEN,
                actual: payload.len(),
            }
            .into());
        }
        if actual != expected {
            return Err(Error::StatusMismatch { expected, actual });
        }
        if payload.len() > MAX_CERTIFICATE_LEN {
            return Err(Error::UnexpectedLength {
                expected: Self::MAX_RESPONSE_LEN,
                actual: response.len(),
            });
        }

        Certificate::parse(payload)
    }
}
