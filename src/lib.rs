//! Split-key authenticated encryption for short payloads.
//!
//! A [`core::EncryptionCore`] derives an AES key and a MAC key from a
//! caller-supplied HMAC key plus one or more high-entropy source byte
//! arrays, then encrypts payloads into compact, self-describing tokens:
//! a format id, an IV, a ciphertext and a MAC, joined by a separator and
//! textually encoded so the result is safe to store in a single text
//! column or URL path segment. Tokens optionally bind to a caller-chosen
//! "subject" string, so the same core can mint non-interchangeable
//! tokens for different principals without holding per-subject keys.
//!
//! Six wire dialects exist across this format's history; this crate
//! decodes all six but only ever produces the current one.

pub use crate::core::EncryptionCore;
pub use crate::error::{Error, Result};

mod base32;
mod blinding;
mod cipher_modes;
mod constant_time;
mod core;
mod entropy;
mod error;
mod packed;
mod padding;
mod protected;
mod rng;
mod token;

#[cfg(test)]
mod tests;

#[macro_export]
macro_rules! bail {
    ($expression:expr, $err:expr) => {
        if !$expression {
            return Err($err);
        }
    };
}
