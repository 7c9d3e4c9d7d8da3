use thiserror::Error;

/// Failures surfaced by the fairness engine. All of them are input
/// validation failures: retrying with the same inputs yields the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FairnessError {
    #[error("invalid input format: {0}")]
    InvalidInputFormat(String),
    #[error("{name} = {value} is out of range [{min}, {max}]")]
    OutOfRangeParameter {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{0} must not be empty")]
    EmptyRequiredField(&'static str),
    #[error("invalid paytable: {0}")]
    InvalidPaytable(String),
    #[error("cannot {action} a round in state {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, FairnessError>;
