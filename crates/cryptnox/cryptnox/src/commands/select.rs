use cryptnox_apdu_core::prelude::*;

use crate::constants::{CLA_ISO, INS_SELECT, P1_SELECT_BY_NAME, P2_FIRST_OR_ONLY, SELECT_RESPONSE_MAX_LEN};
use crate::error::Result;

/// SELECT by application identifier
#[derive(Debug, Clone, Copy)]
pub struct SelectCommand;

impl SelectCommand {
    /// Receive buffer size for the response
    pub const MAX_RESPONSE_LEN: usize = SELECT_RESPONSE_MAX_LEN;

    /// Build a SELECT for `aid`
    pub fn with_aid(aid: &[u8]) -> Result<Command> {
        Ok(Command::new(
            CLA_ISO,
            INS_SELECT,
            P1_SELECT_BY_NAME,
            P2_FIRST_OR_ONLY,
            Bytes::copy_from_slice(aid),
        )?)
    }

    /// Check the answer and return the selection data, if any
    pub fn parse_response(response: &[u8]) -> Result<Bytes> {
        super::expect_success(response).map(Bytes::copy_from_slice)
    }
}
