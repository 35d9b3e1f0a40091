//! Secure channel handshake with Cryptnox smart cards
//!
//! ```no_run
//! # fn demo<T: cryptnox_apdu_core::CardTransport>(transport: T) {
//! use cryptnox::Cryptnox;
//!
//! let mut card = Cryptnox::new(transport);
//! match card.handshake(&mut rand::rng()) {
//!     Ok(session) => println!("salt: {}", hex::encode(session.salt())),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

mod application;
mod certificate;
mod commands;
mod constants;
mod crypto;
mod diagnostics;
mod entropy;
mod error;
mod handshake;
mod session;

pub use application::{CardOutcome, Cryptnox};
pub use certificate::{
    CERTIFICATE_FORMAT_TAG, Certificate, EPHEMERAL_KEY_END, EPHEMERAL_KEY_OFFSET, EphemeralKey,
    MAX_CERTIFICATE_LEN, MIN_CERTIFICATE_LEN, extract_ephemeral_key,
};
pub use commands::*;
pub use crypto::{
    EphemeralKeypair, NamedCurve, PRIVATE_KEY_LEN, PUBLIC_KEY_LEN, SHARED_SECRET_LEN,
    SharedSecret, UNCOMPRESSED_POINT_LEN, compute_shared_secret, generate_keypair,
};
pub use diagnostics::{Diagnostics, NoDiagnostics, TracingDiagnostics, hex_dump, status_summary};
pub use entropy::EntropySource;
pub use error::{Error, HandshakeError, Result};
pub use handshake::{HandshakeConfig, HandshakeState, HandshakeStep};
pub use session::Session;

pub use constants::*;
