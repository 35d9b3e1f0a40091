//! Utility functions for the Cryptnox CLI

pub mod display;
pub mod reader;
