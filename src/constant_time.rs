//! Constant-time byte comparison.

/// Compare two byte slices in time independent of where (or whether) they
/// differ.
///
/// Folds a length-mismatch flag into the same accumulator as the
/// byte-wise XOR-OR chain, so there is a single data-independent branch
/// at the very end (on the accumulator, not on any input byte) rather
/// than an early return on length mismatch. Runs in time depending only
/// on `min(a.len(), b.len())`, plus the fixed-cost length comparison.
#[must_use]
pub fn equals(a: &[u8], b: &[u8]) -> bool {
    let len_diff = (a.len() ^ b.len()) as u64;
    let mut accumulator: u64 = len_diff;

    for i in 0..a.len().min(b.len()) {
        accumulator |= (a[i] ^ b[i]) as u64;
    }

    accumulator == 0
}

#[cfg(test)]
mod tests {
    use super::equals;
    use std::time::Instant;

    #[test]
    fn equal_slices() {
        assert!(equals(b"hello world", b"hello world"));
    }

    #[test]
    fn differing_slices() {
        assert!(!equals(b"hello world", b"hello worle"));
    }

    #[test]
    fn differing_lengths() {
        assert!(!equals(b"short", b"shorter"));
        assert!(!equals(b"", b"a"));
        assert!(equals(b"", b""));
    }

    #[test]
    fn first_byte_differs_still_compares_rest() {
        assert!(!equals(b"Xbcdefgh", b"Ybcdefgh"));
    }

    /// Statistical smoke test: comparing two equal-length 4KiB buffers
    /// should take roughly the same time whether the first difference is
    /// near the start or near the end. This isn't a rigorous timing
    /// analysis, just a sanity check that nothing short-circuits.
    #[test]
    fn timing_is_roughly_independent_of_first_difference() {
        let len = 4096;
        let base = vec![0x42u8; len];

        let mut early_diff = base.clone();
        early_diff[1] = 0x43;

        let mut late_diff = base.clone();
        late_diff[len - 2] = 0x43;

        let rounds = 20_000;

        let t0 = Instant::now();
        for _ in 0..rounds {
            std::hint::black_box(equals(&base, &early_diff));
        }
        let early_elapsed = t0.elapsed();

        let t1 = Instant::now();
        for _ in 0..rounds {
            std::hint::black_box(equals(&base, &late_diff));
        }
        let late_elapsed = t1.elapsed();

        let ratio = early_elapsed.as_secs_f64().max(1e-9) / late_elapsed.as_secs_f64().max(1e-9);
        assert!(
            (0.2..5.0).contains(&ratio),
            "timing ratio {ratio} suggests a data-dependent short-circuit"
        );
    }
}
