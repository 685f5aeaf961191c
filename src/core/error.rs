use thiserror::Error;

/// A rejected input field. `field` uses the config-file name, with
/// `children[i].` prefixes for per-child fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Internal invariant violations in a projection table. Unreachable for
/// tables produced by the engine from a validated plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("projection has {actual} years, expected {expected}")]
    HorizonMismatch { expected: usize, actual: usize },

    #[error("year {index} is out of sequence (age {age}, expected {expected_age})")]
    YearGap {
        index: usize,
        age: u32,
        expected_age: u32,
    },

    #[error("corpus jumps between years {index} and {next}: {end} != {start}")]
    CorpusDiscontinuity {
        index: usize,
        next: usize,
        end: f64,
        start: f64,
    },

    #[error("year {index} expense breakdown sums to {breakdown}, total is {total}")]
    BreakdownMismatch {
        index: usize,
        breakdown: f64,
        total: f64,
    },
}
