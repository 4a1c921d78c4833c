//! Error types surfaced at the automaton core's API boundary.
//!
//! A hand-rolled enum plus `Display`/`std::error::Error`, rather than
//! `thiserror`: the variant set is small and stable, and every message
//! already needs custom formatting.

use std::fmt;

/// Errors raised at the public API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// Negative/oversized array request, out-of-range state number, a
    /// symbol exceeding `alpha_max`, an operation that requires a
    /// deterministic automaton receiving a non-deterministic one, or
    /// `to_automaton` requested with `n` beyond `MAXIMUM_SUPPORTED_DISTANCE`.
    InvalidInput(String),
    /// The build protocol was violated: transitions were added to a state
    /// after it was implicitly or explicitly finished.
    InvalidState(String),
}

impl fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            AutomatonError::InvalidState(msg) => write!(f, "invalid build state: {msg}"),
        }
    }
}

impl std::error::Error for AutomatonError {}

pub type Result<T> = std::result::Result<T, AutomatonError>;
