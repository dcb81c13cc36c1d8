//! Block padding schemes.
//!
//! [`pad`] is the random padding used by the current wire format: it
//! always appends at least one byte, even when the input is already
//! block-aligned, because removal is implicit via the blinding header's
//! in-band length rather than via a padding count stored in the trailer.
//! [`unpad_arbitrary_tail`]/[`pad_arbitrary_tail`] implement the
//! legacy formats' scheme, generalized from the teacher's PKCS#7 `pkcs7`
//! helper (`rc5-block/src/utils.rs`): instead of a fixed pad byte equal
//! to the pad count, the pad byte is any value distinct from the last
//! data byte, and removal scans back over a run of equal trailing bytes.

use crate::error::{Error, Result};
use crate::rng::SecureRandom;

/// Append `block_size - (bytes.len() % block_size)` cryptographically
/// random bytes (always in `[1, block_size]`, never zero).
pub fn pad(bytes: &[u8], block_size: usize, rng: &mut impl SecureRandom) -> Result<Vec<u8>> {
    if !(1..=65_536).contains(&block_size) {
        return Err(Error::argument(format!(
            "block size {block_size} is out of range [1, 65536]"
        )));
    }

    let rem = bytes.len() % block_size;
    let pad_len = block_size - rem;

    let mut out = Vec::with_capacity(bytes.len() + pad_len);
    out.extend_from_slice(bytes);
    out.extend(rng.random_vec(pad_len));
    Ok(out)
}

/// Legacy arbitrary-tail padding: pad with `block_size - (len % block_size)`
/// copies of a random byte distinct from the last data byte, so there is
/// always at least one padding byte and the total length is a multiple
/// of `block_size`.
pub fn pad_arbitrary_tail(
    bytes: &[u8],
    block_size: usize,
    rng: &mut impl SecureRandom,
) -> Result<Vec<u8>> {
    if !(1..=65_536).contains(&block_size) {
        return Err(Error::argument(format!(
            "block size {block_size} is out of range [1, 65536]"
        )));
    }

    let rem = bytes.len() % block_size;
    let pad_len = block_size - rem;

    let last = bytes.last().copied().unwrap_or(0);
    let mut pad_byte = rng.random_byte();
    while pad_byte == last {
        pad_byte = rng.random_byte();
    }

    let mut out = Vec::with_capacity(bytes.len() + pad_len);
    out.extend_from_slice(bytes);
    out.extend(std::iter::repeat_n(pad_byte, pad_len));
    Ok(out)
}

/// Remove legacy arbitrary-tail padding by scanning back from the end
/// over a run of bytes equal to the final byte.
pub fn unpad_arbitrary_tail(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.is_empty() {
        return Err(Error::data_integrity("cannot unpad an empty buffer"));
    }

    let last = *bytes.last().expect("checked non-empty above");
    let mut cut = bytes.len();
    while cut > 0 && bytes[cut - 1] == last {
        cut -= 1;
    }

    Ok(bytes[..cut].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn pad_always_grows_by_between_one_and_block_size() {
        let mut r = rng();
        for len in 0..40 {
            let data = vec![7u8; len];
            let padded = pad(&data, 16, &mut r).unwrap();
            assert_eq!(padded.len() % 16, 0);
            let grew = padded.len() - data.len();
            assert!((1..=16).contains(&grew), "grew by {grew} for len {len}");
        }
    }

    #[test]
    fn pad_never_removes_even_when_aligned() {
        let mut r = rng();
        let data = vec![1u8; 32];
        let padded = pad(&data, 16, &mut r).unwrap();
        assert_eq!(padded.len(), 48);
    }

    #[test]
    fn arbitrary_tail_round_trips() {
        let mut r = rng();
        for data in [&b""[..], b"x", b"hello world", &[9u8; 16], &[0u8; 17]] {
            let padded = pad_arbitrary_tail(data, 16, &mut r).unwrap();
            assert_eq!(padded.len() % 16, 0);
            assert!(padded.len() > data.len());
            let unpadded = unpad_arbitrary_tail(&padded).unwrap();
            assert_eq!(unpadded, data);
        }
    }

    #[test]
    fn arbitrary_tail_pad_byte_never_equals_last_data_byte() {
        let mut r = rng();
        let data = vec![5u8; 16];
        let padded = pad_arbitrary_tail(&data, 16, &mut r).unwrap();
        assert_ne!(padded[16], 5);
    }

    #[test]
    fn rejects_out_of_range_block_size() {
        let mut r = rng();
        assert!(pad(b"x", 0, &mut r).is_err());
        assert!(pad(b"x", 65_537, &mut r).is_err());
    }
}
