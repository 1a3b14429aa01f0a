//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can
//! occur while executing a program, and [`ErrorKind`], the coarse category
//! each error belongs to.
//!
//! Most runtime errors are recoverable: the statement that raised one is
//! replaced by an inline diagnostic and execution continues. The
//! [`ErrorKind::Fatal`] errors (recursion, iteration and trace ceilings) stop
//! the whole run.

use crate::parser::ast::SourceLocation;
use crate::parser::parse::{ParseError, ParseErrorKind};
use crate::parser::segment::SegmentError;
use std::fmt;
use thiserror::Error;

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed statement, unterminated or mismatched block
    Structural,
    /// Undefined or unset variable, undefined procedure
    Reference,
    /// Indexing a non-array, non-boolean condition, wrong operand type for storage
    Type,
    IndexOutOfBounds,
    ArityMismatch,
    /// Malformed expression or invalid operator use
    Evaluation,
    /// INPUT with no line available
    Input,
    /// Resource ceiling reached; aborts the run
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Structural => "StructuralError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Type => "TypeError",
            ErrorKind::IndexOutOfBounds => "IndexOutOfBounds",
            ErrorKind::ArityMismatch => "ArityMismatch",
            ErrorKind::Evaluation => "EvaluationError",
            ErrorKind::Input => "InputError",
            ErrorKind::Fatal => "FatalError",
        };
        f.write_str(name)
    }
}

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Malformed statement syntax or a stray block keyword
    #[error("{message}")]
    Structural {
        message: String,
        location: SourceLocation,
    },

    /// Block opener without closer, FOR/NEXT mismatch, repeated ELSE
    #[error("{source}")]
    Block {
        source: SegmentError,
        location: SourceLocation,
    },

    /// Undefined variable reference
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Variable declared but read before any assignment
    #[error("Variable '{name}' is used before it is assigned")]
    UnsetVariable {
        name: String,
        location: SourceLocation,
    },

    /// Undefined procedure call
    #[error("Undefined procedure '{name}'")]
    UndefinedProcedure {
        name: String,
        location: SourceLocation,
    },

    /// Indexing something that is not an array
    #[error("'{name}' is not an array")]
    NotAnArray {
        name: String,
        location: SourceLocation,
    },

    /// IF/WHILE condition that did not evaluate to BOOLEAN
    #[error("Condition must be BOOLEAN, got {got}")]
    ConditionNotBoolean {
        got: String,
        location: SourceLocation,
    },

    /// Value of the wrong type for where it is used
    #[error("Type error: expected {expected}, got {got}")]
    TypeMismatch {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    /// Array index outside the declared bounds
    #[error("Index {index} is out of bounds for array '{array}' [{lower}:{upper}]")]
    IndexOutOfBounds {
        array: String,
        index: i64,
        lower: i64,
        upper: i64,
        location: SourceLocation,
    },

    /// Procedure argument count mismatch
    #[error(
        "Procedure '{procedure}' expects {expected} argument{}, got {got}",
        if *expected == 1 { "" } else { "s" }
    )]
    ArityMismatch {
        procedure: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Malformed expression or invalid operator use
    #[error("Invalid expression: {message}")]
    Evaluation {
        message: String,
        location: SourceLocation,
    },

    /// ARRAY declaration asking for more cells than the configured ceiling
    #[error("Array '{name}' would hold {cells} cells, more than the limit of {limit}")]
    ArrayTooLarge {
        name: String,
        cells: u128,
        limit: usize,
        location: SourceLocation,
    },

    /// INPUT reached with no line supplied
    #[error("No input available for '{name}'")]
    InputUnavailable {
        name: String,
        location: SourceLocation,
    },

    /// Procedure activations nested deeper than the configured ceiling
    #[error("Recursion limit of {limit} exceeded calling '{procedure}'")]
    RecursionLimit {
        procedure: String,
        limit: usize,
        location: SourceLocation,
    },

    /// A single loop ran more iterations than the configured ceiling
    #[error("Loop exceeded {limit} iterations")]
    IterationLimit {
        limit: usize,
        location: SourceLocation,
    },

    /// Step trace limit exceeded
    #[error("Execution trace limit of {limit} steps exceeded")]
    TraceLimitExceeded {
        limit: usize,
        location: SourceLocation,
    },

    /// Recorded steps grew past the configured memory budget
    #[error("Execution trace exceeded its memory limit of {limit} bytes")]
    TraceMemoryExceeded {
        limit: usize,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::Structural { location, .. }
            | RuntimeError::Block { location, .. }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::UnsetVariable { location, .. }
            | RuntimeError::UndefinedProcedure { location, .. }
            | RuntimeError::NotAnArray { location, .. }
            | RuntimeError::ConditionNotBoolean { location, .. }
            | RuntimeError::TypeMismatch { location, .. }
            | RuntimeError::IndexOutOfBounds { location, .. }
            | RuntimeError::ArityMismatch { location, .. }
            | RuntimeError::Evaluation { location, .. }
            | RuntimeError::ArrayTooLarge { location, .. }
            | RuntimeError::InputUnavailable { location, .. }
            | RuntimeError::RecursionLimit { location, .. }
            | RuntimeError::IterationLimit { location, .. }
            | RuntimeError::TraceLimitExceeded { location, .. }
            | RuntimeError::TraceMemoryExceeded { location, .. } => *location,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Structural { .. } | RuntimeError::Block { .. } => ErrorKind::Structural,
            RuntimeError::UndefinedVariable { .. }
            | RuntimeError::UnsetVariable { .. }
            | RuntimeError::UndefinedProcedure { .. } => ErrorKind::Reference,
            RuntimeError::NotAnArray { .. }
            | RuntimeError::ConditionNotBoolean { .. }
            | RuntimeError::TypeMismatch { .. } => ErrorKind::Type,
            RuntimeError::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            RuntimeError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            RuntimeError::Evaluation { .. } | RuntimeError::ArrayTooLarge { .. } => {
                ErrorKind::Evaluation
            }
            RuntimeError::InputUnavailable { .. } => ErrorKind::Input,
            RuntimeError::RecursionLimit { .. }
            | RuntimeError::IterationLimit { .. }
            | RuntimeError::TraceLimitExceeded { .. }
            | RuntimeError::TraceMemoryExceeded { .. } => ErrorKind::Fatal,
        }
    }

    /// Fatal errors bypass per-statement recovery and end the run
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }

    pub(crate) fn evaluation(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Evaluation {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn type_mismatch(
        expected: impl Into<String>,
        got: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        RuntimeError::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
            location,
        }
    }
}

impl From<ParseError> for RuntimeError {
    fn from(err: ParseError) -> Self {
        match err.kind {
            ParseErrorKind::Statement => RuntimeError::Structural {
                message: err.message,
                location: err.location,
            },
            ParseErrorKind::Expression => RuntimeError::Evaluation {
                message: err.message,
                location: err.location,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_pluralises() {
        let err = RuntimeError::ArityMismatch {
            procedure: "add".to_string(),
            expected: 2,
            got: 1,
            location: SourceLocation::new(4, 1),
        };
        assert_eq!(err.to_string(), "Procedure 'add' expects 2 arguments, got 1");
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);

        let err = RuntimeError::ArityMismatch {
            procedure: "show".to_string(),
            expected: 1,
            got: 0,
            location: SourceLocation::new(4, 1),
        };
        assert_eq!(err.to_string(), "Procedure 'show' expects 1 argument, got 0");
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: RuntimeError = ParseError::statement("bad", SourceLocation::new(2, 1)).into();
        assert_eq!(err.kind(), ErrorKind::Structural);

        let err: RuntimeError = ParseError::expression("bad", SourceLocation::new(2, 5)).into();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert_eq!(err.location().column, 5);
    }

    #[test]
    fn test_only_ceilings_are_fatal() {
        let loc = SourceLocation::new(1, 1);
        assert!(RuntimeError::IterationLimit { limit: 10, location: loc }.is_fatal());
        assert!(RuntimeError::TraceMemoryExceeded { limit: 10, location: loc }.is_fatal());
        assert!(!RuntimeError::evaluation("x", loc).is_fatal());

        let too_large = RuntimeError::ArrayTooLarge {
            name: "a".to_string(),
            cells: 11,
            limit: 10,
            location: loc,
        };
        assert!(!too_large.is_fatal());
        assert_eq!(too_large.kind(), ErrorKind::Evaluation);
    }
}
