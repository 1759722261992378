//! Error types for artifact processing
//!
//! All fallible operations return `Result<T, Error>`.
//! Lenient paths (unknown type kinds, absent optional fields) never error;
//! they are reported through the diagnostic sink instead.

use thiserror::Error;

/// Artifact toolkit error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input is not a well-formed document
    #[error("Parse error: {0}")]
    Parse(String),

    /// A load-bearing field is absent from the input document
    #[error("Missing required field `{field}`")]
    MissingField { field: String },

    /// Strict type walk reached a kind outside the known grammar
    #[error("Unknown type kind at `{path}`")]
    UnknownTypeKind { path: String },

    /// Lookup of a function by name failed
    #[error("Function `{name}` not found in artifact")]
    FunctionNotFound { name: String },

    /// Lookup of a parameter by name failed
    #[error("No `{parameter}` parameter found in function `{function}`")]
    ParameterNotFound { function: String, parameter: String },

    /// Placeholder input blob would exceed the rendering limit
    #[error("Input blob of {words} words exceeds the {limit}-word limit")]
    BlobTooLarge { words: u64, limit: u64 },

    /// Companion tool output did not match the expected text contract
    #[error("Unrecognized deploy output: {0}")]
    OutputFormat(String),

    /// Invalid normalizer configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

/// Result type alias for artifact operations
pub type Result<T> = std::result::Result<T, Error>;
