/*!
# Unified Error Type

This module provides the unified error enum used across the crate. The kinds
mirror the failure semantics of the solver: invariant violations and parse
errors are fatal, compute failures are recovered locally by the caller, and
cancellation is not an error at all but a request to emit the current best.
*/

use std::error::Error;
use std::fmt;

/// Unified error type for all treedec operations.
#[derive(Debug)]
pub enum TreedecError {
    /// A structural invariant was violated. This indicates a bug, for example
    /// re-eliminating an already eliminated vertex or adding a decomposition
    /// edge between nonexistent bags.
    InvariantViolation(String),

    /// The input graph could not be parsed.
    Parse(String),

    /// An atom solver failed unexpectedly. The splitter recovers from this by
    /// substituting a trivial decomposition for the affected atom.
    Compute(String),

    /// The shutdown flag was observed. The current best solution is emitted.
    Cancelled,

    /// I/O error while reading or writing a graph or decomposition.
    Io(String),
}

impl TreedecError {
    /// Creates an invariant-violation error with the given message.
    pub fn invariant(message: impl Into<String>) -> Self {
        TreedecError::InvariantViolation(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        TreedecError::Parse(message.into())
    }

    /// Creates a compute-failure error.
    pub fn compute(message: impl Into<String>) -> Self {
        TreedecError::Compute(message.into())
    }

    /// Returns true if the error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TreedecError::Cancelled)
    }
}

impl fmt::Display for TreedecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreedecError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
            TreedecError::Parse(msg) => write!(f, "Parse error: {}", msg),
            TreedecError::Compute(msg) => write!(f, "Compute failure: {}", msg),
            TreedecError::Cancelled => write!(f, "Cancelled"),
            TreedecError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for TreedecError {}

impl From<std::io::Error> for TreedecError {
    fn from(e: std::io::Error) -> Self {
        TreedecError::Io(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TreedecError>;
