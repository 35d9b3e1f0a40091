//! Wire constants of the Cryptnox applet

/// Application identifier of the Cryptnox wallet applet
pub const CRYPTNOX_AID: &[u8] = b"\xA0\x00\x00\x10\x00\x01\x12";

/// ISO interindustry class
pub const CLA_ISO: u8 = 0x00;
/// Proprietary class used by the applet commands
pub const CLA_PROPRIETARY: u8 = 0x80;

/// SELECT
pub const INS_SELECT: u8 = 0xA4;
/// GET CARD CERTIFICATE
pub const INS_GET_CARD_CERTIFICATE: u8 = 0xF8;
/// OPEN SECURE CHANNEL
pub const INS_OPEN_SECURE_CHANNEL: u8 = 0x10;

/// SELECT P1: select by DF name
pub const P1_SELECT_BY_NAME: u8 = 0x04;
/// SELECT P2: first or only occurrence
pub const P2_FIRST_OR_ONLY: u8 = 0x00;
/// OPEN SECURE CHANNEL P1: pairing slot used without a prior pairing
pub const P1_COMMON_PAIRING_SLOT: u8 = 0xFF;

/// Length of the client challenge sent with GET CARD CERTIFICATE
pub const NONCE_LEN: usize = 8;
/// Length of the salt returned by OPEN SECURE CHANNEL
pub const SALT_LEN: usize = 32;

/// Receive buffer for the SELECT response
pub const SELECT_RESPONSE_MAX_LEN: usize = 26;
/// Full GET CARD CERTIFICATE response, status word included
pub const CERTIFICATE_RESPONSE_LEN: usize = 148;
/// Full OPEN SECURE CHANNEL response, status word included
pub const OPEN_SECURE_CHANNEL_RESPONSE_LEN: usize = 34;
