use crate::error::Result;
use crate::fairness::derive_integer_seed;

/// Replacement for a zero seed, which would lock xorshift at zero forever.
pub const ZERO_SEED_SUBSTITUTE: u32 = 0x9e37_79b9;

/// Deterministic xorshift32 stream returning floats in [0, 1].
///
/// The exact shift triple and the `state / 0xFFFFFFFF` mapping are part of
/// the verification contract; every independent verifier must reproduce
/// them bit for bit. One generator is threaded through peg map generation
/// and then the walk, so draw order matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_SUBSTITUTE } else { seed };
        Self { state }
    }

    /// Seeds from the first four bytes of a hex combined seed.
    pub fn from_combined_seed(combined_seed: &str) -> Result<Self> {
        Ok(Self::new(derive_integer_seed(combined_seed)?))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }
}

impl Iterator for XorShift32 {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_stream() {
        // integer seed of the reference combined seed e1dddf77...
        let rng = XorShift32::new(3_789_414_263);
        let expected = [
            0.1106166649,
            0.7625129215,
            0.0439292176,
            0.4578678816,
            0.3438999297,
        ];
        for (got, want) in rng.take(5).zip(expected) {
            assert!((got - want).abs() < 5e-10, "{got} vs {want}");
        }
    }

    #[test]
    fn test_zero_seed_is_substituted() {
        let mut zero = XorShift32::new(0);
        let mut substitute = XorShift32::new(ZERO_SEED_SUBSTITUTE);
        assert_eq!(zero, substitute);
        let first = zero.next_u32();
        assert_ne!(first, 0);
        assert_eq!(first, substitute.next_u32());
    }

    #[test]
    fn test_determinism() {
        let a: Vec<f64> = XorShift32::new(7).take(32).collect();
        let b: Vec<f64> = XorShift32::new(7).take(32).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
