//! APDU command definitions
//!
//! Commands are always serialized in the short form used by the card:
//! a four byte header, a one byte Lc carrying the payload length, then the payload.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// Largest payload a short-form command can carry
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Length of the `CLA INS P1 P2 Lc` prefix
pub const HEADER_LEN: usize = 5;

/// Errors raised while building or decoding a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Payload does not fit in a one byte Lc field
    #[error("Payload of {0} bytes exceeds the short APDU limit of {MAX_PAYLOAD_LEN} bytes")]
    PayloadTooLong(usize),

    /// Raw bytes do not describe a well-formed short command
    #[error("Invalid command length: {0}")]
    InvalidLength(usize),
}

/// Short-form APDU command
///
/// The declared length (Lc) is always derived from the payload, so the two can
/// never disagree.
#[derive(Clone, PartialEq, Eq)]
pub struct Command {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    data: Bytes,
}

impl Command {
    /// Create a command from its header bytes and payload
    ///
    /// Fails with [`CommandError::PayloadTooLong`] when the payload is longer
    /// than [`MAX_PAYLOAD_LEN`].
    pub fn new<T: Into<Bytes>>(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: T,
    ) -> Result<Self, CommandError> {
        let data = data.into();
        if data.len() > MAX_PAYLOAD_LEN {
            return Err(CommandError::PayloadTooLong(data.len()));
        }

        Ok(Self {
            cla,
            ins,
            p1,
            p2,
            data,
        })
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Declared data length (Lc)
    pub fn declared_length(&self) -> u8 {
        // bounded by the constructor
        self.data.len() as u8
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        HEADER_LEN + self.data.len()
    }

    /// Convert to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        buffer.put_u8(self.declared_length());
        buffer.put_slice(&self.data);

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    ///
    /// The input must be exactly `5 + Lc` bytes long.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CommandError> {
        if data.len() < HEADER_LEN {
            return Err(CommandError::InvalidLength(data.len()));
        }

        let lc = data[4] as usize;
        if data.len() != HEADER_LEN + lc {
            return Err(CommandError::InvalidLength(data.len()));
        }

        Self::new(
            data[0],
            data[1],
            data[2],
            data[3],
            Bytes::copy_from_slice(&data[HEADER_LEN..]),
        )
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("cla", &format_args!("{:#04x}", self.cla))
            .field("ins", &format_args!("{:#04x}", self.ins))
            .field("p1", &format_args!("{:#04x}", self.p1))
            .field("p2", &format_args!("{:#04x}", self.p2))
            .field("data", &hex::encode(&self.data))
            .finish()
    }
}

impl From<Command> for Bytes {
    fn from(command: Command) -> Self {
        command.to_bytes()
    }
}
