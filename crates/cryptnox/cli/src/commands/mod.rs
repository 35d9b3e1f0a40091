//! Command implementations for the Cryptnox CLI

mod card_operations;

pub use card_operations::*;
