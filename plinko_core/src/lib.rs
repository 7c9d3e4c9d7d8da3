pub mod engine;
pub mod error;
pub mod fairness;
pub mod paytable;
pub mod pegmap;
pub mod prng;
pub mod round;
pub mod verify;

pub use crate::engine::{
    bias_adjustment, center_column, parse_path, simulate, simulate_with_params, Decision,
    EngineParams, SimulationResult, DEFAULT_BIAS_ADJUSTMENT_PER_COLUMN, DEFAULT_ROWS, MAX_ROWS,
};
pub use crate::error::{FairnessError, Result};
pub use crate::fairness::{
    compute_combined_seed, compute_commitment_hash, derive_hash_hex, derive_integer_seed,
    generate_nonce, generate_server_seed, ServerSecret,
};
pub use crate::paytable::Paytable;
pub use crate::pegmap::{Peg, PegMap};
pub use crate::prng::XorShift32;
pub use crate::round::{PublishedRound, Round, RoundOutcome, RoundReveal, RoundStatus};
pub use crate::verify::{audit, verify, AuditCheck, AuditReport, Claims, Verification};
