//! Shared fixtures for the handshake tests
#![allow(dead_code)]

use std::collections::VecDeque;

use bytes::Bytes;
use cryptnox::{Diagnostics, Error, HandshakeStep};
use cryptnox_apdu_core::{CardTransport, StatusWord, TransportError};
use rand::RngCore;

// NIST CAVP KAS ECC CDH primitive, P-256, COUNT = 0.
// The card plays the CAVS side, the client the IUT side.
pub const CARD_PUBLIC_KEY: &str = "700c48f77f56584c5cc632ca65640db91b6bacce3a4df6b42ce7cc838833d287\
                                   db71e509e3fd9b060ddb20ba5c51dcc5948d46fbf640dfe0441782cab85fa4ac";
pub const CLIENT_PRIVATE_KEY: &str =
    "7d7dc5f71eb29ddaf80d6214632eeae03d9058af1fb6d22ed80badb62bc1a534";
pub const CLIENT_PUBLIC_KEY: &str = "ead218590119e8876b29146ff89ca61770c4edbbf97d38ce385ed281d8a6b230\
                                     28af61281fd35e2fa7002523acc85a429cb06ee6648325389f59edfce1405141";
pub const SHARED_SECRET: &str = "46fc62106420ff012e54a434fbdd2d25ccc5852060561e68040dd7778997bd7b";

pub const NONCE: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
pub const CARD_NONCE: [u8; 8] = [0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8];
pub const SALT: [u8; 32] = [0x5A; 32];

pub const SW_SUCCESS: [u8; 2] = [0x90, 0x00];

/// Applet answer to SELECT
pub fn select_response() -> Bytes {
    Bytes::from_static(&[0x41, 0x10, 0x01, 0x90, 0x00])
}

/// Certificate carrying `card_public_key` (hex, 64 bytes), without status word
pub fn certificate_with_key(card_public_key: &str) -> Vec<u8> {
    let mut cert = vec![b'C'];
    cert.extend_from_slice(&CARD_NONCE);
    cert.push(0x04);
    cert.extend_from_slice(&hex::decode(card_public_key).unwrap());
    // DER signature placeholder: SEQUENCE of two 33-byte INTEGERs
    cert.extend_from_slice(&[0x30, 0x46, 0x02, 0x21, 0x00]);
    cert.extend_from_slice(&[0x11; 32]);
    cert.extend_from_slice(&[0x02, 0x21, 0x00]);
    cert.extend_from_slice(&[0x22; 32]);
    assert_eq!(cert.len(), 146);
    cert
}

/// Full 148-byte GET CARD CERTIFICATE answer
pub fn certificate_response() -> Bytes {
    let mut raw = certificate_with_key(CARD_PUBLIC_KEY);
    raw.extend_from_slice(&SW_SUCCESS);
    raw.into()
}

/// Full 34-byte OPEN SECURE CHANNEL answer
pub fn open_secure_channel_response() -> Bytes {
    let mut raw = SALT.to_vec();
    raw.extend_from_slice(&SW_SUCCESS);
    raw.into()
}

/// The three answers of a successful handshake
pub fn happy_path() -> Vec<Bytes> {
    vec![
        select_response(),
        certificate_response(),
        open_secure_channel_response(),
    ]
}

/// Entropy yielding the challenge, then the client scalar, then zeros
pub fn fixed_entropy() -> SequenceEntropy {
    let mut bytes = NONCE.to_vec();
    bytes.extend_from_slice(&hex::decode(CLIENT_PRIVATE_KEY).unwrap());
    SequenceEntropy::new(bytes)
}

/// Transport replaying canned answers and recording every command
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: VecDeque<Result<Bytes, TransportError>>,
    pub commands: Vec<Bytes>,
    pub max_lengths: Vec<usize>,
    pub present: bool,
    pub uid: Option<Bytes>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = Bytes>) -> Self {
        Self {
            responses: responses.into_iter().map(Ok).collect(),
            present: true,
            ..Default::default()
        }
    }

    pub fn push_error(&mut self, error: TransportError) {
        self.responses.push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl CardTransport for ScriptedTransport {
    fn do_exchange(&mut self, command: &[u8], max_response_len: usize) -> Result<Bytes, TransportError> {
        self.commands.push(Bytes::copy_from_slice(command));
        self.max_lengths.push(max_response_len);
        self.responses
            .pop_front()
            .unwrap_or(Err(TransportError::Timeout))
    }

    fn is_card_present(&mut self) -> bool {
        self.present
    }

    fn read_uid(&mut self) -> Result<Bytes, TransportError> {
        self.uid.clone().ok_or(TransportError::NoCard)
    }
}

/// Hands out a fixed byte sequence, then zeros
#[derive(Debug)]
pub struct SequenceEntropy {
    bytes: VecDeque<u8>,
}

impl SequenceEntropy {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl RngCore for SequenceEntropy {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst {
            *byte = self.bytes.pop_front().unwrap_or(0);
        }
    }
}

/// Diagnostics event, as recorded by [`RecordingDiagnostics`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(HandshakeStep, Vec<u8>),
    Response(HandshakeStep, Vec<u8>),
    Status(HandshakeStep, StatusWord),
    Completed(HandshakeStep),
    Failed(HandshakeStep, Error),
    Uid(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    pub events: Vec<Event>,
}

impl Diagnostics for RecordingDiagnostics {
    fn command_sent(&mut self, step: HandshakeStep, apdu: &[u8]) {
        self.events.push(Event::Command(step, apdu.to_vec()));
    }

    fn response_received(&mut self, step: HandshakeStep, response: &[u8]) {
        self.events.push(Event::Response(step, response.to_vec()));
    }

    fn status_word(&mut self, step: HandshakeStep, status: StatusWord) {
        self.events.push(Event::Status(step, status));
    }

    fn step_completed(&mut self, step: HandshakeStep) {
        self.events.push(Event::Completed(step));
    }

    fn step_failed(&mut self, step: HandshakeStep, error: &Error) {
        self.events.push(Event::Failed(step, error.clone()));
    }

    fn uid_read(&mut self, uid: &[u8]) {
        self.events.push(Event::Uid(uid.to_vec()));
    }
}
