//! Error types shared by the type system, the value model and the codec.
//!
//! Every failure is reported synchronously to the caller. Nothing in this
//! crate retries, recovers or logs-and-continues.

use thiserror::Error;

/// A construction or declaration that is structurally invalid.
///
/// Types are rendered into the message eagerly so the error does not borrow
/// from the type arena.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("expected a subtype of {expected}, found {found}")]
    Mismatch { expected: String, found: String },

    #[error("relation elements must be tuples, found {found}")]
    NotATuple { found: String },

    #[error("{found} is not a {expected}")]
    WrongKind { expected: &'static str, found: String },

    #[error("{ty} takes {expected} children, got {found}")]
    Arity {
        ty: String,
        expected: usize,
        found: usize,
    },

    #[error("cannot make a value of type {ty}")]
    NotConstructible { ty: String },

    #[error("alias `{name}` is already declared as {existing}, cannot redeclare it as {requested}")]
    AliasRedeclared {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("data type `{name}` is already declared as {existing}, cannot redeclare it as {requested}")]
    AdtRedeclared {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("`{name}` is already declared as {existing}")]
    NameClash { name: String, existing: String },

    #[error("data type `{name}` is not declared in this store")]
    UndeclaredAdt { name: String },

    #[error("no constructor `{adt}::{name}` accepts ({args})")]
    UndeclaredConstructor {
        adt: String,
        name: String,
        args: String,
    },
}

/// A writer was used after `done()` already produced its value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} writer is already done")]
pub struct WriterStateError {
    pub kind: &'static str,
}

/// Failure of a writer operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    State(#[from] WriterStateError),
}

/// Failure while writing or reading the canonical text form.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying sink or source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input does not follow the grammar.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A token follows the grammar but cannot be decoded (overflow, bad escape).
    #[error("malformed {what} `{text}`: {reason}")]
    Malformed {
        what: &'static str,
        text: String,
        reason: String,
    },

    #[error("nesting exceeds the maximum depth of {max_depth}")]
    TooDeep { max_depth: usize },

    /// Well-formed text describing an ill-typed value.
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    State(#[from] WriterStateError),
}

impl From<BuildError> for CodecError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Type(err) => CodecError::Type(err),
            BuildError::State(err) => CodecError::State(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_converts_into_codec_error() {
        let err = BuildError::from(TypeError::UndeclaredAdt {
            name: "E".to_string(),
        });
        let codec: CodecError = err.into();
        assert!(matches!(codec, CodecError::Type(TypeError::UndeclaredAdt { .. })));
    }

    #[test]
    fn test_messages() {
        let err = TypeError::Arity {
            ty: "tuple[int, int]".to_string(),
            expected: 2,
            found: 3,
        };
        assert_eq!(err.to_string(), "tuple[int, int] takes 2 children, got 3");
        assert_eq!(
            WriterStateError { kind: "set" }.to_string(),
            "set writer is already done"
        );
    }
}
