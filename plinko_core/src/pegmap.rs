use std::fmt::Write;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::fairness::derive_hash_hex;
use crate::prng::XorShift32;

const BIAS_CENTER: f64 = 0.5;
// raw draws in [0, 1] map onto [0.4, 0.6]
const BIAS_SPREAD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peg {
    /// Probability of bouncing left, in [0, 1].
    pub left_bias: f64,
}

/// Triangular board: row `i` holds `i + 1` pegs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PegMap(pub Vec<Vec<Peg>>);

/// Rounds to 6 decimals exactly the way a decimal formatter does, so the
/// value survives a text round trip through any verifier unchanged.
pub fn round6(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(value)
}

impl PegMap {
    /// Draws one value per peg, row by row, left to right.
    pub fn generate(rng: &mut XorShift32, rows: usize) -> Self {
        let mut map = Vec::with_capacity(rows);
        for row in 0..rows {
            let pegs = (0..=row)
                .map(|_| {
                    let raw = rng.next_f64();
                    Peg {
                        left_bias: round6(BIAS_CENTER + (raw - BIAS_CENTER) * BIAS_SPREAD),
                    }
                })
                .collect();
            map.push(pegs);
        }
        Self(map)
    }

    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, row: usize, peg: usize) -> Option<&Peg> {
        self.0.get(row).and_then(|r| r.get(peg))
    }

    /// Compact JSON text `[[{"leftBias":0.422123}],[...],...]` with each bias
    /// in its shortest round-trip decimal form. Built by hand rather than
    /// through serde so the bytes never depend on a serializer version.
    pub fn canonical_encoding(&self) -> String {
        let pegs: usize = self.0.iter().map(Vec::len).sum();
        let mut out = String::with_capacity(2 + pegs * 24);
        out.push('[');
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                out.push(',');
            }
            out.push('[');
            for (p, peg) in row.iter().enumerate() {
                if p > 0 {
                    out.push(',');
                }
                // writing into a String cannot fail
                let _ = write!(out, "{{\"leftBias\":{}}}", peg.left_bias);
            }
            out.push(']');
        }
        out.push(']');
        out
    }

    /// SHA-256 of [`canonical_encoding`](Self::canonical_encoding), hex encoded.
    pub fn hash_hex(&self) -> String {
        derive_hash_hex(self.canonical_encoding().as_bytes())
    }
}

impl Index<usize> for PegMap {
    type Output = [Peg];

    fn index(&self, row: usize) -> &[Peg] {
        &self.0[row]
    }
}
