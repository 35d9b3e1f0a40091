//! Randomness supply for challenges and ephemeral keys
//!
//! The handshake never reaches for a process-wide generator: the caller passes
//! an [`EntropySource`] to every call that needs randomness. Any
//! [`rand::RngCore`] qualifies, so `rand::rng()` is the usual choice and a
//! seeded generator gives reproducible handshakes in tests.

/// Source of cryptographically strong random bytes
pub trait EntropySource {
    /// Fill `buffer` entirely with random bytes
    fn fill_random(&mut self, buffer: &mut [u8]);
}

impl<R: rand::RngCore + ?Sized> EntropySource for R {
    fn fill_random(&mut self, buffer: &mut [u8]) {
        self.fill_bytes(buffer);
    }
}
