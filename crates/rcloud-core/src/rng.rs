#![forbid(unsafe_code)]

//! Random sources for cosmetic randomness (burst geometry, API keys).
//!
//! Nothing here is cryptographic. The browser frontend feeds
//! `Math.random()`; tests use [`Xorshift64`] or [`SequenceRandom`] so output
//! is reproducible.

/// Maximum base-36 digits emitted per fragment.
const BASE36_MAX_DIGITS: usize = 11;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform sample in `[min, max)`.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    /// `true` with probability `1 - threshold`, matching `Math.random() > threshold`.
    fn above(&mut self, threshold: f64) -> bool {
        self.next_f64() > threshold
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Deterministic xorshift64 PRNG.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Zero seeds are remapped; xorshift must never hold state 0.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Xorshift64 {
    fn next_f64(&mut self) -> f64 {
        // Top 53 bits give a uniform double in [0, 1).
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceRandom {
    /// Samples are clamped into `[0, 1)`. An empty list always yields `0.0`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos = self.pos.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Fractional digits of `sample` in base 36.
///
/// Equivalent to `sample.toString(36).slice(2)` for the digit counts a
/// double carries, capped at 11 digits. A zero sample yields `"0"` so the
/// fragment is never empty.
#[must_use]
pub fn base36_fragment(sample: f64) -> String {
    let mut frac = if sample.is_finite() {
        sample.fract().abs()
    } else {
        0.0
    };
    let mut out = String::with_capacity(BASE36_MAX_DIGITS);
    while frac > 0.0 && out.len() < BASE36_MAX_DIGITS {
        frac *= 36.0;
        let digit = frac.floor();
        frac -= digit;
        out.push(char::from(BASE36_DIGITS[digit as usize % 36]));
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn xorshift_is_deterministic_and_in_unit_interval() {
        let mut a = Xorshift64::new(42);
        let mut b = Xorshift64::new(42);
        for _ in 0..1000 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn xorshift_zero_seed_does_not_stick() {
        let mut r = Xorshift64::new(0);
        assert_ne!(r.next_u64(), 0);
    }

    #[test]
    fn range_scales_samples() {
        let mut r = SequenceRandom::new([0.0, 0.5]);
        assert_eq!(r.range(-10.0, 10.0), -10.0);
        assert_eq!(r.range(-10.0, 10.0), 0.0);
    }

    #[test]
    fn sequence_cycles() {
        let mut r = SequenceRandom::new([0.25, 0.75]);
        assert_eq!(r.next_f64(), 0.25);
        assert_eq!(r.next_f64(), 0.75);
        assert_eq!(r.next_f64(), 0.25);
        assert_eq!(SequenceRandom::new(Vec::new()).next_f64(), 0.0);
    }

    #[test]
    fn base36_exact_fractions() {
        assert_eq!(base36_fragment(0.5), "i");
        assert_eq!(base36_fragment(0.25), "9");
        assert_eq!(base36_fragment(0.0), "0");
    }

    #[test]
    fn base36_fragment_is_bounded_and_alphanumeric() {
        let mut r = Xorshift64::new(7);
        for _ in 0..500 {
            let frag = base36_fragment(r.next_f64());
            assert!(!frag.is_empty() && frag.len() <= 11, "{frag}");
            assert!(frag.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        }
    }
}
