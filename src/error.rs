//! Error channel (§7, §9 "error channel"): host errors and user-thrown values
//! propagate through the same `Result<_, EvalError>` path until a `try*` handler or
//! the REPL top level.

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("{function}: expected {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
    },

    #[error("{function}: {message}")]
    RuntimeError { function: String, message: String },

    #[error("unknown key: {0}")]
    UndefinedSymbol(String),

    #[error("not callable")]
    NotCallable,

    #[error("{0}")]
    Reader(#[from] ReaderError),

    #[error("{0}")]
    Thrown(Value),
}

impl EvalError {
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> EvalError {
        EvalError::ArityMismatch {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn type_error(function: &str, expected: impl Into<String>, actual: &Value) -> EvalError {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.into(),
            actual: actual.type_name().to_string(),
        }
    }

    pub fn runtime_error(function: &str, message: impl Into<String>) -> EvalError {
        EvalError::RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }

    /// The value a `try*`/`catch*` handler binds (§7): the thrown value directly, or
    /// a `Str` wrapping the host message otherwise.
    pub fn into_caught_value(self) -> Value {
        match self {
            EvalError::Thrown(v) => v,
            other => Value::string(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    #[error("unexpected EOF")]
    UnexpectedEof,

    #[error("expected '{0}'")]
    ExpectedClose(char),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unexpected '{0}'")]
    UnexpectedCloseDelim(char),

    #[error("odd number of map items")]
    OddMapItems,

    #[error("invalid hash-map key")]
    BadMapKey,

    #[error("integer literal out of range: {0}")]
    IntOverflow(String),
}
