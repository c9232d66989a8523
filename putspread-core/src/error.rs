//! Error taxonomy for the evaluation core.
//!
//! `InputError` covers anything wrong with the price series handed in by a
//! loader. `EvaluationError` wraps it and adds the degenerate-computation
//! and bad-window cases. Neither is retried inside the core.

use chrono::NaiveDate;
use thiserror::Error;

/// Problems with the price series itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("price series too short: {actual} points, need at least {required}")]
    TooShort { required: usize, actual: usize },

    #[error("malformed price point at index {index} ({date}): {reason}")]
    MalformedPoint {
        index: usize,
        date: NaiveDate,
        reason: &'static str,
    },

    #[error("dates not strictly increasing at index {index}: {previous} followed by {current}")]
    NonMonotonicDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}

/// Errors surfaced by `compute_metrics` and `evaluate`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("degenerate computation: {metric} is not finite")]
    ComputationDegenerate { metric: &'static str },

    #[error("invalid indicator config: {0}")]
    InvalidConfig(String),
}

impl EvaluationError {
    /// True when the caller supplied bad data (as opposed to a numeric edge case).
    pub fn is_input_error(&self) -> bool {
        matches!(self, EvaluationError::Input(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_message_names_both_lengths() {
        let err = InputError::TooShort {
            required: 200,
            actual: 150,
        };
        let msg = err.to_string();
        assert!(msg.contains("150"));
        assert!(msg.contains("200"));
    }

    #[test]
    fn input_error_converts_into_evaluation_error() {
        let err: EvaluationError = InputError::EmptySeries.into();
        assert!(err.is_input_error());
        assert!(!EvaluationError::ComputationDegenerate { metric: "rsi" }.is_input_error());
    }
}
