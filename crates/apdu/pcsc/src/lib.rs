//! PC/SC transport adapter
//!
//! This crate implements the `CardTransport` capability from
//! `cryptnox-apdu-core` on top of the PC/SC API. Contactless readers expose
//! ISO-DEP cards through PC/SC, so this is the adapter used to reach a card from
//! a desktop host.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cryptnox_apdu_core::CardTransport;
//! use cryptnox_apdu_transport_pcsc::{ConnectStrategy, PcscConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::new()?;
//! for reader in manager.list_readers()? {
//!     println!("{} (card: {})", reader.name(), reader.has_card());
//! }
//!
//! let mut transport = manager.connect_strategy(ConnectStrategy::AnyCard, PcscConfig::default())?;
//! if transport.is_card_present() {
//!     let response = transport.exchange(&[0x00, 0xA4, 0x04, 0x00, 0x00], 258)?;
//!     println!("{}", hex::encode(response));
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;
mod util;

pub use config::{ConnectStrategy, PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
