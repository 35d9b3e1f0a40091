use cryptnox_apdu_core::prelude::*;

use crate::constants::{
    CLA_PROPRIETARY, INS_OPEN_SECURE_CHANNEL, OPEN_SECURE_CHANNEL_RESPONSE_LEN,
    P1_COMMON_PAIRING_SLOT, SALT_LEN,
};
use crate::crypto::{PUBLIC_KEY_LEN, UNCOMPRESSED_POINT_TAG};
use crate::error::{Error, Result};

/// OPEN SECURE CHANNEL with the client's ephemeral public key
#[derive(Debug, Clone, Copy)]
pub struct OpenSecureChannelCommand;

impl OpenSecureChannelCommand {
    /// Receive buffer size for the response
    pub const MAX_RESPONSE_LEN: usize = OPEN_SECURE_CHANNEL_RESPONSE_LEN;

    /// Build the command from a 64-byte `X || Y` public point
    ///
    /// The point is sent in SEC1 uncompressed form.
    pub fn with_public_key(public_key: &[u8; PUBLIC_KEY_LEN]) -> Result<Command> {
        let mut data = BytesMut::with_capacity(PUBLIC_KEY_LEN + 1);
        data.extend_from_slice(&[UNCOMPRESSED_POINT_TAG]);
        data.extend_from_slice(public_key);

        Ok(Command::new(
            CLA_PROPRIETARY,
            INS_OPEN_SECURE_CHANNEL,
            P1_COMMON_PAIRING_SLOT,
            0x00,
            data.freeze(),
        )?)
    }

    /// Check the answer and return the session salt
    ///
    /// The response must be exactly 34 bytes: the salt and `90 00`.
    pub fn parse_response(response: &[u8]) -> Result<[u8; SALT_LEN]> {
        let payload = super::expect_success(response)?;
        if response.len() != Self::MAX_RESPONSE_LEN {
            return Err(Error::UnexpectedLength {
                expected: Self::MAX_RESPONSE_LEN,
                actual: response.len(),
            });
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(payload);
        Ok(salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_secure_channel_wire_format() {
        let key: [u8; 64] = std::array::from_fn(|i| i as u8);
        let bytes = OpenSecureChannelCommand::with_public_key(&key)
            .unwrap()
            .to_bytes();

        assert_eq!(bytes.len(), 70);
        assert_eq!(&bytes[..6], &[0x80, 0x10, 0xFF, 0x00, 0x41, 0x04]);
        assert_eq!(&bytes[6..], &key[..]);
    }

    #[test]
    fn test_open_secure_channel_response() {
        let mut raw = vec![0xE7; 32];
        raw.extend_from_slice(&[0x90, 0x00]);
        assert_eq!(
            OpenSecureChannelCommand::parse_response(&raw).unwrap(),
            [0xE7; 32]
        );
    }

    #[test]
    fn test_open_secure_channel_wrong_length() {
        let mut raw = vec![0xE7; 28];
        raw.extend_from_slice(&[0x90, 0x00]);
        assert_eq!(
            OpenSecureChannelCommand::parse_response(&raw),
            Err(Error::UnexpectedLength {
                expected: 34,
                actual: 30,
            })
        );
    }

    #[test]
    fn test_open_secure_channel_error_status() {
        assert_eq!(
            OpenSecureChannelCommand::parse_response(&[0x6A, 0x86]),
            Err(Error::StatusMismatch {
                expected: status::SUCCESS,
                actual: status::INCORRECT_P1P2,
            })
        );
    }
}
