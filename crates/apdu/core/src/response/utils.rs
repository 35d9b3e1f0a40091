//! Utility functions for APDU response handling

use crate::response::error::ResponseError;
use crate::response::status::StatusWord;
use tracing::debug;

/// Number of trailing status bytes in every response
pub const STATUS_WORD_LEN: usize = 2;

/// Extract status word (SW1, SW2) and payload from raw APDU response data
///
/// Returns a tuple containing:
/// - The status word as a tuple (SW1, SW2)
/// - The payload data (without the status word)
///
/// # Errors
/// Returns an error if the data is too short to contain a valid status word.
pub fn extract_response_parts(data: &[u8]) -> Result<((u8, u8), &[u8]), ResponseError> {
    if data.len() < STATUS_WORD_LEN {
        debug!("Response too short: {} bytes", data.len());
        return Err(ResponseError::Incomplete(data.len()));
    }

    let (payload, trailer) = data.split_at(data.len() - STATUS_WORD_LEN);
    Ok(((trailer[0], trailer[1]), payload))
}

/// Extract status word as a StatusWord object and payload from raw APDU response data
///
/// # Errors
/// Returns an error if the data is too short to contain a valid status word.
pub fn extract_status_and_payload(data: &[u8]) -> Result<(StatusWord, &[u8]), ResponseError> {
    let ((sw1, sw2), payload) = extract_response_parts(data)?;
    Ok((StatusWord::new(sw1, sw2), payload))
}

/// Check whether the trailing status word equals `(sw1, sw2)`
///
/// A mismatch is a normal outcome and yields `Ok(false)`. Only a response too
/// short to carry a status word is an error.
pub fn check_status(response: &[u8], sw1: u8, sw2: u8) -> Result<bool, ResponseError> {
    let (status, _) = extract_status_and_payload(response)?;
    Ok(status.matches(sw1, sw2))
}

/// Return the response without its trailing status word
///
/// Meant to be called once [`check_status`] has passed; shorter inputs yield
/// an empty slice.
pub fn strip_status(response: &[u8]) -> &[u8] {
    &response[..response.len().saturating_sub(STATUS_WORD_LEN)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_response_parts() {
        let data = [0x01, 0x02, 0x03, 0x90, 0x00];
        let result = extract_response_parts(&data).unwrap();
        assert_eq!(result.0, (0x90, 0x00));
        assert_eq!(result.1, &[0x01, 0x02, 0x03]);

        let data = [0x90, 0x00];
        let result = extract_response_parts(&data).unwrap();
        assert_eq!(result.0, (0x90, 0x00));
        assert!(result.1.is_empty());

        assert_eq!(
            extract_response_parts(&[0x90]),
            Err(ResponseError::Incomplete(1))
        );
    }

    #[test]
    fn test_check_status_short_response() {
        assert_eq!(check_status(&[], 0x90, 0x00), Err(ResponseError::Incomplete(0)));
        assert_eq!(
            check_status(&[0x90], 0x90, 0x00),
            Err(ResponseError::Incomplete(1))
        );
    }

    #[test]
    fn test_check_status_success_and_bit_flips() {
        let fixture = [0xDE, 0xAD, 0x90, 0x00];
        assert_eq!(check_status(&fixture, 0x90, 0x00), Ok(true));

        for byte in [2usize, 3] {
            for bit in 0..8 {
                let mut mutated = fixture;
                mutated[byte] ^= 1 << bit;
                assert_eq!(
                    check_status(&mutated, 0x90, 0x00),
                    Ok(false),
                    "flipping bit {bit} of byte {byte} must fail"
                );
            }
        }
    }

    #[test]
    fn test_strip_status() {
        assert_eq!(strip_status(&[0x01, 0x02, 0x90, 0x00]), &[0x01, 0x02]);
        assert!(strip_status(&[0x90, 0x00]).is_empty());
        assert!(strip_status(&[0x90]).is_empty());
    }
}
