//! Injected randomness seam.
//!
//! The source this crate is derived from reaches for a process-wide PRNG
//! singleton wherever it needs random bytes. Matching the teacher's own
//! `random_iv`/`random_nonce_and_counter` shape (a plain function that
//! pulls from `rand::thread_rng()`), but threading the generator through
//! as a value rather than reaching for a global, lets callers swap in a
//! deterministic generator for tests without touching call sites.

use rand_core::{CryptoRng, RngCore};

/// Anything that can supply cryptographically-sized randomness.
///
/// Implemented for any `RngCore + CryptoRng`, so `rand::rngs::OsRng` and
/// `rand_chacha::ChaCha8Rng` (seeded, for deterministic tests) both work
/// out of the box.
pub trait SecureRandom {
    fn fill(&mut self, buf: &mut [u8]);

    fn random_byte(&mut self) -> u8 {
        let mut b = [0u8; 1];
        self.fill(&mut b);
        b[0]
    }

    fn random_vec(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf);
        buf
    }
}

impl<T: RngCore + CryptoRng> SecureRandom for T {
    fn fill(&mut self, buf: &mut [u8]) {
        self.fill_bytes(buf);
    }
}

/// Default randomness source: the platform's cryptographic PRNG.
pub fn default_rng() -> rand::rngs::OsRng {
    rand::rngs::OsRng
}
