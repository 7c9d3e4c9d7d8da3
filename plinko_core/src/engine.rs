use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{FairnessError, Result},
    paytable::Paytable,
    pegmap::PegMap,
    prng::XorShift32,
};

pub const DEFAULT_ROWS: usize = 12;
pub const DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN: f64 = 0.01;
/// Upper bound on board height; the peg map grows quadratically with rows.
pub const MAX_ROWS: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParams {
    pub rows: usize,
    pub bias_adjustment_per_column: f64,
    pub paytable: Paytable,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            bias_adjustment_per_column: DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN,
            paytable: Paytable::reference(),
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> Result<()> {
        check_rows(self.rows)?;
        check_bias(self.bias_adjustment_per_column)?;
        if self.paytable.bins() != self.rows + 1 {
            return Err(FairnessError::InvalidPaytable(format!(
                "{} rows need {} bins, table has {}",
                self.rows,
                self.rows + 1,
                self.paytable.bins()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Left => "L",
            Decision::Right => "R",
        })
    }
}

/// Parses a compact `LRRL...` path back into decisions.
pub fn parse_path(path: &str) -> Result<Vec<Decision>> {
    path.chars()
        .map(|c| match c {
            'L' | 'l' => Ok(Decision::Left),
            'R' | 'r' => Ok(Decision::Right),
            other => Err(FairnessError::InvalidInputFormat(format!(
                "path may only contain L or R, found {other:?}"
            ))),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub peg_map: PegMap,
    pub peg_map_hash: String,
    pub decisions: Vec<Decision>,
    pub bin_index: usize,
}

impl SimulationResult {
    /// Decisions as a compact `LRRL...` string.
    pub fn path(&self) -> String {
        self.decisions.iter().map(Decision::to_string).collect()
    }
}

fn check_rows(rows: usize) -> Result<()> {
    if rows == 0 || rows > MAX_ROWS {
        return Err(FairnessError::OutOfRangeParameter {
            name: "rows",
            value: rows as i64,
            min: 1,
            max: MAX_ROWS as i64,
        });
    }
    Ok(())
}

fn check_bias(bias_adjustment_per_column: f64) -> Result<()> {
    if !bias_adjustment_per_column.is_finite() {
        return Err(FairnessError::InvalidInputFormat(format!(
            "bias adjustment per column must be finite, got {bias_adjustment_per_column}"
        )));
    }
    Ok(())
}

pub fn center_column(rows: usize) -> usize {
    rows / 2
}

/// Shift added to every peg's left bias for a drop column. Right of center
/// makes Left more likely.
pub fn bias_adjustment(rows: usize, drop_column: usize, per_column: f64) -> f64 {
    (drop_column as i64 - center_column(rows) as i64) as f64 * per_column
}

/// Walks the board using the draws that follow peg map generation.
fn walk(rng: &mut XorShift32, peg_map: &PegMap, adjustment: f64) -> (Vec<Decision>, usize) {
    let mut decisions = Vec::with_capacity(peg_map.rows());
    let mut right_moves = 0usize;
    for (row, pegs) in peg_map.0.iter().enumerate() {
        // the ball can never be further right than the row index
        let peg_index = right_moves.min(row);
        let adjusted = (pegs[peg_index].left_bias + adjustment).clamp(0.0, 1.0);
        if rng.next_f64() < adjusted {
            decisions.push(Decision::Left);
        } else {
            decisions.push(Decision::Right);
            right_moves += 1;
        }
    }
    (decisions, right_moves)
}

/// Runs the deterministic drop for a combined seed.
///
/// Rejects `rows == 0`, `rows > MAX_ROWS`, `drop_column > rows` and a
/// non-finite bias; out-of-range inputs are never clamped. `None` for the
/// bias uses [`DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN`].
pub fn simulate(
    combined_seed: &str,
    rows: usize,
    drop_column: usize,
    bias_adjustment_per_column: Option<f64>,
) -> Result<SimulationResult> {
    let per_column = bias_adjustment_per_column.unwrap_or(DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN);
    check_rows(rows)?;
    check_bias(per_column)?;
    if drop_column > rows {
        return Err(FairnessError::OutOfRangeParameter {
            name: "drop_column",
            value: drop_column as i64,
            min: 0,
            max: rows as i64,
        });
    }

    let mut rng = XorShift32::from_combined_seed(combined_seed)?;
    let peg_map = PegMap::generate(&mut rng, rows);
    let peg_map_hash = peg_map.hash_hex();
    let adjustment = bias_adjustment(rows, drop_column, per_column);
    let (decisions, bin_index) = walk(&mut rng, &peg_map, adjustment);

    debug!(rows, drop_column, adjustment, bin_index, %peg_map_hash, "simulated drop");
    Ok(SimulationResult {
        peg_map,
        peg_map_hash,
        decisions,
        bin_index,
    })
}

/// [`simulate`] with configured board height and bias.
pub fn simulate_with_params(
    combined_seed: &str,
    drop_column: usize,
    params: &EngineParams,
) -> Result<SimulationResult> {
    simulate(
        combined_seed,
        params.rows,
        drop_column,
        Some(params.bias_adjustment_per_column),
    )
}
