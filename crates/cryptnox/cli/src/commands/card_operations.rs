//! Handshake and tag identification commands

use std::error::Error;

use cryptnox::{CardOutcome, Cryptnox, Diagnostics, HandshakeConfig};
use cryptnox_apdu_core::CardTransport;
use cryptnox_apdu_transport_pcsc::PcscTransport;

use crate::utils::display;

/// Run the handshake and print the session
pub fn handshake_command(
    transport: PcscTransport,
    diagnostics: &mut dyn Diagnostics,
    config: HandshakeConfig,
) -> Result<(), Box<dyn Error>> {
    let mut card = Cryptnox::with_diagnostics(transport, diagnostics).with_config(config);

    match card.handshake(&mut rand::rng()) {
        Ok(session) => {
            println!("{}", display::success("Secure channel established"));
            println!("{}", display::session_box(&session));
            Ok(())
        }
        Err(e) => {
            println!("{}", display::handshake_failure(&e));
            Err(e.into())
        }
    }
}

/// Handshake with an APDU card, or identify a simpler tag by its UID
pub fn process_command(
    transport: PcscTransport,
    diagnostics: &mut dyn Diagnostics,
    config: HandshakeConfig,
) -> Result<(), Box<dyn Error>> {
    let mut card = Cryptnox::with_diagnostics(transport, diagnostics).with_config(config);

    match card.process_card(&mut rand::rng()) {
        CardOutcome::Authenticated(session) => {
            println!("{}", display::success("Secure channel established"));
            println!("{}", display::session_box(&session));
        }
        CardOutcome::Failed(e) => {
            println!("{}", display::handshake_failure(&e));
            return Err(e.into());
        }
        CardOutcome::Uid(uid) => {
            println!("{}", display::info("Tag does not support APDUs"));
            println!("{}", display::uid_box(&uid));
        }
        CardOutcome::NoCard(e) => {
            println!("{}", display::warning("No card in the field"));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Read the UID of the tag in the field
pub fn uid_command(mut transport: PcscTransport) -> Result<(), Box<dyn Error>> {
    let uid = transport.read_uid()?;
    println!("{}", display::uid_box(&uid));
    Ok(())
}
