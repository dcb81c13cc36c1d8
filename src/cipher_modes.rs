//! AES-128 block-cipher modes used by the wire formats.
//!
//! Only CBC is ever used to *produce* a token (format 6, and format 5
//! before it); CFB and CTR exist purely so the legacy formats 1..3 can
//! still be *decoded*. This mirrors the teacher's `modes.rs` split
//! between an `OperationMode` selector and small per-mode encrypt/decrypt
//! functions, generalized from RC5's ECB/CBC/CTR to the AES modes this
//! spec's wire formats name.

use aes::Aes128;
use cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};

use crate::error::{Error, Result};

type CbcEnc = cbc::Encryptor<Aes128>;
type CbcDec = cbc::Decryptor<Aes128>;
type CfbEnc = cfb_mode::Encryptor<Aes128>;
type CfbDec = cfb_mode::Decryptor<Aes128>;
type Ctr128 = ctr::Ctr128BE<Aes128>;

pub const AES_KEY_LEN: usize = 16;
pub const AES_BLOCK_LEN: usize = 16;

fn check_key_iv(key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != AES_KEY_LEN || iv.len() != AES_BLOCK_LEN {
        return Err(Error::CryptoPrimitive);
    }
    Ok(())
}

/// Encrypt `data` (must already be a multiple of the AES block size) in
/// CBC mode with no further padding.
pub fn cbc_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_key_iv(key, iv)?;
    if data.len() % AES_BLOCK_LEN != 0 {
        return Err(Error::CryptoPrimitive);
    }
    let enc = CbcEnc::new(key.into(), iv.into());
    Ok(enc.encrypt_padded_vec_mut::<NoPadding>(data))
}

/// Decrypt `data` (must already be a multiple of the AES block size) in
/// CBC mode with no padding removal.
pub fn cbc_decrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_key_iv(key, iv)?;
    if data.is_empty() || data.len() % AES_BLOCK_LEN != 0 {
        return Err(Error::CryptoPrimitive);
    }
    let dec = CbcDec::new(key.into(), iv.into());
    dec.decrypt_padded_vec_mut::<NoPadding>(data)
        .map_err(|_| Error::CryptoPrimitive)
}

/// AES-CFB encrypt (legacy format 1). Operates on any-length byte
/// streams; no block padding involved.
pub fn cfb_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_key_iv(key, iv)?;
    let mut buf = data.to_vec();
    CfbEnc::new(key.into(), iv.into()).apply_keystream(&mut buf);
    Ok(buf)
}

/// AES-CFB decrypt (legacy format 1).
pub fn cfb_decrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_key_iv(key, iv)?;
    let mut buf = data.to_vec();
    CfbDec::new(key.into(), iv.into()).apply_keystream(&mut buf);
    Ok(buf)
}

/// AES-CTR encrypt/decrypt (legacy formats 2 and 3). CTR is its own
/// inverse, so a single function serves both directions.
pub fn ctr_apply(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_key_iv(key, iv)?;
    let mut buf = data.to_vec();
    Ctr128::new(key.into(), iv.into()).apply_keystream(&mut buf);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbc_round_trips() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 16];
        let data = [0x33u8; 48];

        let ct = cbc_encrypt(&key, &iv, &data).unwrap();
        assert_eq!(ct.len(), data.len());
        let pt = cbc_decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(pt, data);
    }

    #[test]
    fn cfb_round_trips() {
        let key = [0x44u8; 16];
        let iv = [0x55u8; 16];
        let data = b"not block aligned!!";

        let ct = cfb_encrypt(&key, &iv, data).unwrap();
        let pt = cfb_decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(pt, data);
    }

    #[test]
    fn ctr_round_trips() {
        let key = [0x66u8; 16];
        let iv = [0x77u8; 16];
        let data = b"also not block aligned";

        let ct = ctr_apply(&key, &iv, data).unwrap();
        let pt = ctr_apply(&key, &iv, &ct).unwrap();
        assert_eq!(pt, data);
    }

    #[test]
    fn rejects_wrong_key_or_iv_length() {
        assert!(cbc_encrypt(&[0u8; 15], &[0u8; 16], &[0u8; 16]).is_err());
        assert!(cbc_encrypt(&[0u8; 16], &[0u8; 15], &[0u8; 16]).is_err());
    }
}
