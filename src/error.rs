//! Error Definitions
//!
//! One error type covers the whole pipeline: the XML front-end, the
//! lowering engine, and the backend emitter. Lowering aborts on the first
//! error; there is no partial recovery.

use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("undefined variable `{0}` — it was never declared in the current function")]
    UndefinedVariable(String),

    #[error("malformed `{kind}` node: {reason}")]
    MalformedNode { kind: String, reason: String },

    #[error("invalid program document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("IR builder error: {0}")]
    Builder(#[from] inkwell::builder::BuilderError),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::MalformedNode`].
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedNode {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
