use serde::{Deserialize, Serialize};

use crate::error::{FairnessError, Result};

/// Multiplier applied when a bin has no table entry.
pub const FALLBACK_MULTIPLIER: f64 = 1.0;

/// Bin index -> payout multiplier. Sized `rows + 1`; edge bins pay most.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paytable(pub Vec<f64>);

impl Paytable {
    pub fn new(multipliers: Vec<f64>) -> Result<Self> {
        if multipliers.is_empty() {
            return Err(FairnessError::InvalidPaytable("no bins".into()));
        }
        if let Some((bin, m)) = multipliers
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(FairnessError::InvalidPaytable(format!(
                "bin {bin} has multiplier {m}"
            )));
        }
        Ok(Self(multipliers))
    }

    /// The 13-bin table for a 12-row board.
    pub fn reference() -> Self {
        Self(vec![
            15.0, 5.0, 3.0, 2.0, 1.5, 1.2, 1.0, 1.2, 1.5, 2.0, 3.0, 5.0, 15.0,
        ])
    }

    pub fn bins(&self) -> usize {
        self.0.len()
    }

    pub fn multiplier(&self, bin_index: usize) -> f64 {
        self.0.get(bin_index).copied().unwrap_or(FALLBACK_MULTIPLIER)
    }

    pub fn is_symmetric(&self) -> bool {
        self.0.iter().eq(self.0.iter().rev())
    }

    /// Whole cents won for a bet landing in `bin_index`, rounded down.
    pub fn payout_cents(&self, bet_cents: u64, bin_index: usize) -> u64 {
        (bet_cents as f64 * self.multiplier(bin_index)).floor() as u64
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_table() {
        let table = Paytable::reference();
        assert_eq!(table.bins(), 13);
        assert!(table.is_symmetric());
        assert_eq!(table.multiplier(0), 15.0);
        assert_eq!(table.multiplier(6), 1.0);
        assert_eq!(table.multiplier(12), 15.0);
        assert_eq!(table.multiplier(13), FALLBACK_MULTIPLIER);
    }

    #[test]
    fn test_payout_cents() {
        let table = Paytable::reference();
        assert_eq!(table.payout_cents(100, 0), 1500);
        assert_eq!(table.payout_cents(99, 5), 118);
        assert_eq!(table.payout_cents(100, 40), 100);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(Paytable::new(vec![]).is_err());
        assert!(Paytable::new(vec![1.0, f64::NAN]).is_err());
        assert!(Paytable::new(vec![-1.0]).is_err());
        let table = Paytable::new(vec![2.0, 0.5, 3.0]).unwrap();
        assert!(!table.is_symmetric());
    }
}
