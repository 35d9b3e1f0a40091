//! Commands exchanged during the handshake
//!
//! Each command knows how to build its APDU and how to read the card's answer.
//! Parsers take the raw response, status word included, as returned by
//! [`CardTransport::exchange`](cryptnox_apdu_core::CardTransport::exchange).

mod get_card_certificate;
mod open_secure_channel;
mod select;

pub use get_card_certificate::GetCardCertificateCommand;
pub use open_secure_channel::OpenSecureChannelCommand;
pub use select::SelectCommand;

use cryptnox_apdu_core::prelude::*;

use crate::error::{Error, Result};

/// Require `90 00` and return the payload
fn expect_success(response: &[u8]) -> Result<&[u8]> {
    let expected = status::SUCCESS;
    if !utils::check_status(response, expected.sw1, expected.sw2)? {
        let (actual, _) = utils::extract_status_and_payload(response)?;
        return Err(Error::StatusMismatch { expected, actual });
    }
    Ok(utils::strip_status(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_success() {
        assert_eq!(expect_success(&[0x01, 0x90, 0x00]), Ok(&[0x01][..]));
        assert_eq!(expect_success(&[0x90, 0x00]), Ok(&[][..]));
        assert_eq!(
            expect_success(&[0x6A, 0x82]),
            Err(Error::StatusMismatch {
                expected: status::SUCCESS,
                actual: status::FILE_NOT_FOUND,
            })
        );
        assert_eq!(
            expect_success(&[0x90]),
            Err(Error::MalformedResponse(ResponseError::Incomplete(1)))
        );
    }
}
