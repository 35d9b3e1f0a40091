//! Core types for APDU (Application Protocol Data Unit) exchanges
//!
//! This crate provides the building blocks shared by every card-facing crate in
//! the workspace:
//!
//! - Building short-form command APDUs (`CLA INS P1 P2 Lc data`)
//! - Splitting responses into payload and status word, and checking the status word
//! - The [`CardTransport`] capability implemented by each physical link adapter
//!
//! Only single-frame exchanges are modelled. There is no command chaining and no
//! extended-length framing: payloads are limited to 255 bytes.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;
pub mod transport;

pub use command::{Command, CommandError, MAX_PAYLOAD_LEN};
pub use response::error::ResponseError;
pub use response::status::StatusWord;
pub use response::Response;
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{Bytes, BytesMut};

    // Command related
    pub use crate::command::{Command, CommandError};

    // Response related
    pub use crate::response::Response;
    pub use crate::response::error::ResponseError;
    pub use crate::response::status::{StatusWord, common as status};
    pub use crate::response::utils;

    // Transport layer
    pub use crate::transport::{CardTransport, TransportError};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00, vec![0xA0u8, 0x00]).unwrap();
        assert_eq!(cmd.class(), 0x00);
        assert_eq!(cmd.instruction(), 0xA4);
        assert_eq!(cmd.p1(), 0x04);
        assert_eq!(cmd.p2(), 0x00);

        let resp = Response::from_bytes(&[0x01, 0x02, 0x90, 0x00]).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.payload().as_ref(), &[0x01, 0x02]);
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
