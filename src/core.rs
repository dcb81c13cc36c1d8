//! The encryption core: split-key derivation, subject specialization,
//! and token assembly/parsing.

use std::sync::{Mutex, PoisonError};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::blinding;
use crate::cipher_modes;
use crate::constant_time;
use crate::entropy;
use crate::error::{Error, Result};
use crate::padding;
use crate::protected::ProtectedByteArray;
use crate::rng::{default_rng, SecureRandom};
use crate::token::{self, CURRENT_FORMAT_ID};

type HmacSha256 = Hmac<Sha256>;

const MIN_MAC_KEY_LEN: usize = 14;
const MAX_MAC_KEY_LEN: usize = 32;
const PREFIX_SALT: [u8; 2] = [0x54, 0x75];
const POSTFIX_SALT: [u8; 2] = [0x70, 0x57];
const BLINDING_MIN_TOTAL_LEN: usize = cipher_modes::AES_BLOCK_LEN + 1;
const SUBJECT_AWARE_FORMAT_ID: u8 = 5;

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| Error::CryptoPrimitive)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

/// `HMAC-SHA-256(k1, k2 || PREFIX_SALT || subject_utf8 || POSTFIX_SALT)`.
fn specialize(k1: &[u8], k2: &[u8], subject: &str) -> Result<Vec<u8>> {
    hmac_sha256(
        k1,
        &[k2, &PREFIX_SALT, subject.as_bytes(), &POSTFIX_SALT],
    )
}

struct CoreInner {
    enc_key: ProtectedByteArray,
    mac_key: ProtectedByteArray,
    rng: Box<dyn SecureRandom + Send>,
}

/// Owns the two derived keys and performs subject-specialized
/// encrypt/decrypt of short payloads into self-describing, authenticated
/// tokens.
///
/// Thread-safe via a coarse instance-wide mutex: at most one
/// `encrypt`/`decrypt`/`close` call runs against a given instance at a
/// time. Different instances are fully independent. Closing an instance
/// (explicitly, or via `Drop`) destroys both key handles; every
/// operation after that fails with [`Error::Destroyed`].
pub struct EncryptionCore {
    inner: Mutex<CoreInner>,
}

impl EncryptionCore {
    /// Construct a core from a MAC key (14..32 bytes) and one or more
    /// source byte arrays, using the platform's cryptographic PRNG for
    /// all randomness.
    pub fn new(mac_key: &[u8], sources: &[&[u8]]) -> Result<Self> {
        Self::new_with_rng(mac_key, sources, default_rng())
    }

    /// As [`Self::new`], but with an injected randomness source. Used by
    /// tests to get deterministic tokens from a seeded generator.
    pub fn new_with_rng<R>(mac_key: &[u8], sources: &[&[u8]], rng: R) -> Result<Self>
    where
        R: SecureRandom + Send + 'static,
    {
        crate::bail!(
            mac_key.len() >= MIN_MAC_KEY_LEN,
            Error::argument("HMAC key length is less than 14")
        );
        crate::bail!(
            mac_key.len() <= MAX_MAC_KEY_LEN,
            Error::argument("HMAC key length is larger than 32")
        );

        entropy::validate_source_arrays(sources)?;

        let mut concatenated = Vec::new();
        for source in sources {
            concatenated.extend_from_slice(source);
        }

        let mut derived = hmac_sha256(mac_key, &[concatenated.as_slice()])?;
        concatenated.zeroize();

        let mut enc_key_bytes = derived[0..16].to_vec();
        let mut mac_key_bytes = derived[16..32].to_vec();
        derived.zeroize();

        let enc_key = ProtectedByteArray::new(&mut enc_key_bytes);
        let mac_key = ProtectedByteArray::new(&mut mac_key_bytes);

        Ok(Self {
            inner: Mutex::new(CoreInner {
                enc_key,
                mac_key,
                rng: Box::new(rng),
            }),
        })
    }

    /// Encrypt `payload` under `subject` (pass `""` for the default,
    /// unspecialized key), returning a format-6 token.
    pub fn encrypt(&self, payload: &[u8], subject: &str) -> Result<String> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let inner = &mut *guard;

        let mut blinded = blinding::wrap(payload, BLINDING_MIN_TOTAL_LEN, inner.rng.as_mut())?;
        let mut padded = padding::pad(&blinded, cipher_modes::AES_BLOCK_LEN, inner.rng.as_mut())?;
        blinded.zeroize();

        let mut iv = inner.rng.random_vec(cipher_modes::AES_BLOCK_LEN);

        let mut enc_key_bytes = inner.enc_key.data()?;
        let mut mac_key_bytes = inner.mac_key.data()?;

        let mut specialized_enc_key = if subject.is_empty() {
            enc_key_bytes.clone()
        } else {
            specialize(&mac_key_bytes, &enc_key_bytes, subject)?
        };

        let mut ciphertext = cipher_modes::cbc_encrypt(&specialized_enc_key, &iv, &padded)?;
        padded.zeroize();
        specialized_enc_key.zeroize();

        let mut specialized_mac_key = if subject.is_empty() {
            mac_key_bytes.clone()
        } else {
            specialize(&enc_key_bytes, &mac_key_bytes, subject)?
        };
        enc_key_bytes.zeroize();
        mac_key_bytes.zeroize();

        let mut mac = hmac_sha256(
            &specialized_mac_key,
            &[&[CURRENT_FORMAT_ID], iv.as_slice(), ciphertext.as_slice()],
        )?;
        specialized_mac_key.zeroize();

        let result = token::format_current(&iv, &ciphertext, &mac);

        iv.zeroize();
        ciphertext.zeroize();
        mac.zeroize();

        Ok(result)
    }

    /// Encrypt a UTF-8 string payload.
    pub fn encrypt_string(&self, payload: &str, subject: &str) -> Result<String> {
        self.encrypt(payload.as_bytes(), subject)
    }

    /// Decrypt `token`, verifying the MAC in constant time before any
    /// plaintext is produced, and return the recovered payload bytes.
    pub fn decrypt_as_bytes(&self, token_str: &str, subject: &str) -> Result<Vec<u8>> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let inner = &*guard;

        let parts = token::parse(token_str)?;
        let format_id = parts.format_id;
        let subject_aware = format_id >= SUBJECT_AWARE_FORMAT_ID;

        let mut enc_key_bytes = inner.enc_key.data()?;
        let mut mac_key_bytes = inner.mac_key.data()?;

        let mut mac_key_used = if subject_aware && !subject.is_empty() {
            specialize(&enc_key_bytes, &mac_key_bytes, subject)?
        } else {
            mac_key_bytes.clone()
        };

        let computed_mac = hmac_sha256(
            &mac_key_used,
            &[
                &[format_id],
                parts.iv.as_slice(),
                parts.encrypted.as_slice(),
            ],
        )?;
        mac_key_used.zeroize();

        if !constant_time::equals(&computed_mac, &parts.mac) {
            enc_key_bytes.zeroize();
            mac_key_bytes.zeroize();
            return Err(Error::data_integrity("Checksum does not match data"));
        }

        let mut enc_key_used = if subject_aware && !subject.is_empty() {
            specialize(&mac_key_bytes, &enc_key_bytes, subject)?
        } else {
            enc_key_bytes.clone()
        };
        enc_key_bytes.zeroize();
        mac_key_bytes.zeroize();

        let mut decrypted = match format_id {
            1 => cipher_modes::cfb_decrypt(&enc_key_used, &parts.iv, &parts.encrypted)?,
            2 | 3 => cipher_modes::ctr_apply(&enc_key_used, &parts.iv, &parts.encrypted)?,
            4..=6 => cipher_modes::cbc_decrypt(&enc_key_used, &parts.iv, &parts.encrypted)?,
            _ => unreachable!("format id range already validated during parse"),
        };
        enc_key_used.zeroize();

        let payload = match format_id {
            1 | 2 => padding::unpad_arbitrary_tail(&decrypted)?,
            3..=6 => blinding::unwrap(&decrypted)?,
            _ => unreachable!("format id range already validated during parse"),
        };
        decrypted.zeroize();

        Ok(payload)
    }

    /// Decrypt `token` and interpret the recovered bytes as strict UTF-8
    /// text.
    pub fn decrypt_as_string(&self, token_str: &str, subject: &str) -> Result<String> {
        let bytes = self.decrypt_as_bytes(token_str, subject)?;
        String::from_utf8(bytes).map_err(Error::from)
    }

    /// Destroy both key handles. Idempotent; every later operation on
    /// this instance fails with [`Error::Destroyed`].
    pub fn close(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.enc_key.close();
        guard.mac_key.close();
    }
}

impl Drop for EncryptionCore {
    fn drop(&mut self) {
        self.close();
    }
}
