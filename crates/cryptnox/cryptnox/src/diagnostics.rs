//! Observation of handshake traffic
//!
//! The orchestrator reports every APDU it sends and receives, the status word of
//! each answer and the outcome of each step to a [`Diagnostics`] sink. Sinks only
//! observe: swapping [`TracingDiagnostics`] for [`NoDiagnostics`] changes no
//! protocol behavior.

use std::fmt::{self, Write as _};

use cryptnox_apdu_core::StatusWord;
use tracing::{Level, debug, info, warn};

use crate::error::Error;
use crate::handshake::HandshakeStep;

/// Bytes per line in [`hex_dump`]
const HEX_DUMP_WIDTH: usize = 16;

/// Receiver of handshake events
///
/// Every method has an empty default, so a sink only overrides what it cares about.
pub trait Diagnostics: fmt::Debug {
    /// A command is about to be sent
    fn command_sent(&mut self, _step: HandshakeStep, _apdu: &[u8]) {}

    /// A response was received, status word included
    fn response_received(&mut self, _step: HandshakeStep, _response: &[u8]) {}

    /// Status word of the response just received
    fn status_word(&mut self, _step: HandshakeStep, _status: StatusWord) {}

    /// A step finished successfully
    fn step_completed(&mut self, _step: HandshakeStep) {}

    /// A step failed and the handshake stops
    fn step_failed(&mut self, _step: HandshakeStep, _error: &Error) {}

    /// UID of a tag that does not run APDUs
    fn uid_read(&mut self, _uid: &[u8]) {}
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn command_sent(&mut self, step: HandshakeStep, apdu: &[u8]) {
        (**self).command_sent(step, apdu);
    }

    fn response_received(&mut self, step: HandshakeStep, response: &[u8]) {
        (**self).response_received(step, response);
    }

    fn status_word(&mut self, step: HandshakeStep, status: StatusWord) {
        (**self).status_word(step, status);
    }

    fn step_completed(&mut self, step: HandshakeStep) {
        (**self).step_completed(step);
    }

    fn step_failed(&mut self, step: HandshakeStep, error: &Error) {
        (**self).step_failed(step, error);
    }

    fn uid_read(&mut self, uid: &[u8]) {
        (**self).uid_read(uid);
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {}

/// Sink that forwards events to `tracing`
///
/// APDUs are logged at debug level as hex dumps; step outcomes at info and warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn command_sent(&mut self, step: HandshakeStep, apdu: &[u8]) {
        debug!(%step, len = apdu.len(), "APDU sent:\n{}", hex_dump(apdu));
    }

    fn response_received(&mut self, step: HandshakeStep, response: &[u8]) {
        debug!(%step, len = response.len(), "APDU received:\n{}", hex_dump(response));
    }

    fn status_word(&mut self, step: HandshakeStep, status: StatusWord) {
        let level = status.tracing_level();
        if level == Level::DEBUG {
            debug!(%step, "{}", status_summary(status));
        } else if level == Level::INFO {
            info!(%step, "{}", status_summary(status));
        } else {
            warn!(%step, "{}", status_summary(status));
        }
    }

    fn step_completed(&mut self, step: HandshakeStep) {
        info!(%step, "Step completed");
    }

    fn step_failed(&mut self, step: HandshakeStep, error: &Error) {
        warn!(%step, %error, "Step failed");
    }

    fn uid_read(&mut self, uid: &[u8]) {
        info!(uid = %hex::encode_upper(uid), "Tag without APDU support");
    }
}

/// Render bytes as `0xNN` tokens, sixteen per line
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5);
    for (line_no, line) in bytes.chunks(HEX_DUMP_WIDTH).enumerate() {
        if line_no > 0 {
            out.push('\n');
        }
        for (i, byte) in line.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing to a String cannot fail
            let _ = write!(out, "{byte:#04X}");
        }
    }
    out
}

/// One-line description of a status word
pub fn status_summary(status: StatusWord) -> String {
    format!(
        "SW1/SW2: {:#04X} {:#04X} ({})",
        status.sw1,
        status.sw2,
        status.description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_wraps_at_sixteen() {
        assert_eq!(hex_dump(&[]), "");
        assert_eq!(hex_dump(&[0x00, 0xA4, 0x0F]), "0x00 0xA4 0x0F");

        let dump = hex_dump(&[0xABu8; 33]);
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(' ').count(), 16);
        assert_eq!(lines[1].split(' ').count(), 16);
        assert_eq!(lines[2], "0xAB");
    }

    #[test]
    fn test_status_summary() {
        assert_eq!(
            status_summary(StatusWord::new(0x90, 0x00)),
            "SW1/SW2: 0x90 0x00 (Success)"
        );
        assert_eq!(
            status_summary(StatusWord::new(0x6A, 0x82)),
            "SW1/SW2: 0x6A 0x82 (File not found)"
        );
    }
}
