//! Token wire format: parsing all six historical dialects and emitting
//! the current one (format 6).

use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurpose, DecodePaddingMode, GeneralPurposeConfig},
    Engine as _,
};
use zeroize::Zeroize;

use crate::base32;
use crate::error::{Error, Result};

pub const CURRENT_FORMAT_ID: u8 = 6;

/// The in-memory decomposition of a token. All three byte fields are
/// wiped when the value is dropped.
#[derive(Zeroize)]
pub struct EncryptionParts {
    #[zeroize(skip)]
    pub format_id: u8,
    pub iv: Vec<u8>,
    pub encrypted: Vec<u8>,
    pub mac: Vec<u8>,
}

impl Drop for EncryptionParts {
    fn drop(&mut self) {
        self.zeroize();
    }
}

fn separator_for(format_id: u8) -> char {
    if format_id >= CURRENT_FORMAT_ID {
        '1'
    } else {
        '$'
    }
}

/// Legacy tokens are documented as padded for format 1 and unpadded from
/// format 2 onward, but real-world format 3..5 tokens have been observed
/// carrying trailing `=` padding anyway (the encoder's padding choice
/// changed under it across historical releases). Decode leniently,
/// accepting a field with or without padding, rather than rejecting
/// otherwise-valid legacy tokens.
fn legacy_base64_engine() -> GeneralPurpose {
    GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
    )
}

fn decode_field(format_id: u8, field: &str) -> Result<Vec<u8>> {
    if format_id >= CURRENT_FORMAT_ID {
        return base32::decode_spell_safe(field);
    }
    legacy_base64_engine()
        .decode(field)
        .map_err(|e| Error::argument(format!("invalid base64 in token: {e}")))
}

/// Parse a token string into its constituent parts, decoding whichever
/// of the six wire dialects the leading format digit selects.
pub fn parse(token: &str) -> Result<EncryptionParts> {
    let mut chars = token.chars();
    let first = chars
        .next()
        .ok_or_else(|| Error::argument("Invalid format id"))?;

    if !first.is_ascii_digit() {
        return Err(Error::argument("Invalid format id"));
    }
    let format_id = first.to_digit(10).expect("checked is_ascii_digit") as u8;
    if !(1..=6).contains(&format_id) {
        return Err(Error::argument("Unknown format id"));
    }

    let separator = separator_for(format_id);
    let parts: Vec<&str> = token.split(separator).collect();
    if parts.len() != 4 {
        return Err(Error::argument(
            "Number of '$' separated parts in encrypted text is not 4",
        ));
    }
    if parts[0] != first.to_string() {
        return Err(Error::argument(
            "Number of '$' separated parts in encrypted text is not 4",
        ));
    }

    let iv = decode_field(format_id, parts[1])?;
    let encrypted = decode_field(format_id, parts[2])?;
    let mac = decode_field(format_id, parts[3])?;

    Ok(EncryptionParts {
        format_id,
        iv,
        encrypted,
        mac,
    })
}

/// Assemble a format-6 token: `6 1 <iv> 1 <ciphertext> 1 <mac>`, all
/// fields unpadded spell-safe Base32.
#[must_use]
pub fn format_current(iv: &[u8], encrypted: &[u8], mac: &[u8]) -> String {
    format!(
        "{CURRENT_FORMAT_ID}1{}1{}1{}",
        base32::encode_spell_safe(iv, false),
        base32::encode_spell_safe(encrypted, false),
        base32::encode_spell_safe(mac, false),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_format_six() {
        let iv = vec![1u8; 16];
        let encrypted = vec![2u8; 32];
        let mac = vec![3u8; 32];

        let token = format_current(&iv, &encrypted, &mac);
        let parts = parse(&token).unwrap();

        assert_eq!(parts.format_id, 6);
        assert_eq!(parts.iv, iv);
        assert_eq!(parts.encrypted, encrypted);
        assert_eq!(parts.mac, mac);
    }

    #[test]
    fn rejects_non_digit_leading_character() {
        let err = parse("Qsomething$else$here").unwrap_err();
        assert!(matches!(err, Error::Argument(ref m) if m == "Invalid format id"));
    }

    #[test]
    fn rejects_out_of_range_format_digit() {
        let err = parse("99abc").unwrap_err();
        assert!(matches!(err, Error::Argument(ref m) if m == "Unknown format id"));
    }

    #[test]
    fn rejects_wrong_number_of_dollar_parts() {
        let err = parse("5$one$two").unwrap_err();
        assert!(matches!(
            err,
            Error::Argument(ref m) if m == "Number of '$' separated parts in encrypted text is not 4"
        ));
    }

    #[test]
    fn parses_known_format_five_token() {
        let token = "3$J/LJT9XGjwfmsKsvHzFefQ==$iJIhCFfmzwPVqDwJai30ei5WTpU3/7qhiBS7WbPQCCHJKppD06B2LsRP7tgqh+1g$C9mHKfJi5mdMdIOZWep2GhZl7fNk98c3fBD6j404RXY=";
        let parts = parse(token).unwrap();
        assert_eq!(parts.format_id, 3);
        assert_eq!(parts.iv.len(), 16);
        assert_eq!(parts.mac.len(), 32);
    }
}
