//! Shannon entropy gate over externally supplied "source" byte arrays.
//!
//! Rejects source material with too little entropy or too short an
//! overall length to safely seed key derivation.

use crate::error::{Error, Result};

const MIN_SOURCE_LEN: usize = 100;
const MAX_SOURCE_LEN: usize = 10_000_000;
const MIN_INFORMATION_BITS: f64 = 128.0;
const NEAR_ZERO_ENTROPY: f64 = 0.0001;

/// A running 256-way byte-value histogram plus a Shannon entropy
/// calculation over it.
#[derive(Default)]
pub struct EntropyGate {
    histogram: [u64; 256],
    count: u64,
}

impl EntropyGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.histogram[b as usize] += 1;
        }
        self.count += bytes.len() as u64;
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Shannon entropy in bits per byte, `-sum p_i log2 p_i`, over the
    /// 256-symbol alphabet observed so far.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let total = self.count as f64;
        self.histogram
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum()
    }

    /// `round(entropy * count)`, the total information content in bits.
    #[must_use]
    pub fn information_in_bits(&self) -> u64 {
        (self.entropy() * self.count as f64).round() as u64
    }

    /// `entropy / 8`, the maximum entropy over 256 symbols.
    #[must_use]
    pub fn relative_entropy(&self) -> f64 {
        self.entropy() * 0.125
    }

    /// Number of distinct byte values observed.
    #[must_use]
    pub fn distinct_values(&self) -> usize {
        self.histogram.iter().filter(|&&c| c > 0).count()
    }
}

/// Validate a set of externally supplied source byte arrays: none may be
/// empty, the concatenated length must fall in `[100, 10_000_000]`, and
/// the overall Shannon information content must be at least 128 bits.
pub fn validate_source_arrays(arrays: &[&[u8]]) -> Result<EntropyGate> {
    let mut gate = EntropyGate::new();

    for (i, arr) in arrays.iter().enumerate() {
        if arr.is_empty() {
            return Err(Error::argument(format!(
                "{}. source byte array has 0 length",
                i + 1
            )));
        }
        gate.add_bytes(arr);
    }

    let count = gate.count();
    if !(MIN_SOURCE_LEN as u64..=MAX_SOURCE_LEN as u64).contains(&count) {
        return Err(Error::argument(format!(
            "source byte array(s) have a total length of {count} bytes, \
             must be in [{MIN_SOURCE_LEN}, {MAX_SOURCE_LEN}]"
        )));
    }

    if gate.distinct_values() < 2 {
        return Err(Error::argument(
            "insufficient entropy: no information provided, there are only identical byte values",
        ));
    }

    let info_bits = gate.information_in_bits();
    if (info_bits as f64) < MIN_INFORMATION_BITS {
        let entropy = gate.entropy();
        if entropy <= NEAR_ZERO_ENTROPY {
            return Err(Error::argument(
                "insufficient entropy: no information provided, there are only identical byte values",
            ));
        }
        let needed = (MIN_INFORMATION_BITS / entropy).ceil() as u64 + 1;
        return Err(Error::argument(format!(
            "source bytes carry only {info_bits} bits of information, need at least \
             {MIN_INFORMATION_BITS} bits; increase length to at least {needed} bytes"
        )));
    }

    Ok(gate)
}
