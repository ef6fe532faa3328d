use core::fmt;

/// Result alias for `textnet`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the text-to-network pipeline.
///
/// Every stage reports problems at its own boundary; nothing is retried and no
/// stage substitutes a default for a rejected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty (no documents, or no vocabulary left after filtering).
    EmptyInput {
        /// What was empty.
        what: &'static str,
    },

    /// A configuration value is unrecognized or out of range.
    InvalidConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// The community-detection collaborator failed.
    ExternalToolFailure {
        /// Name of the detector.
        tool: String,
        /// Diagnostic reported by the detector.
        diagnostic: String,
    },

    /// Two documents in a corpus share an identifier.
    DuplicateDocument {
        /// The repeated identifier.
        id: String,
    },

    /// A node label was not found in the graph.
    UnknownNode {
        /// The label that was looked up.
        label: String,
    },

    /// Filesystem failure while saving or loading.
    Io(String),

    /// Malformed or unserializable persisted graph.
    Serialization(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            name,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput { what } => write!(f, "empty input: {what}"),
            Error::InvalidConfiguration { name, message } => {
                write!(f, "invalid configuration '{name}': {message}")
            }
            Error::ExternalToolFailure { tool, diagnostic } => {
                write!(f, "community detection with {tool} failed: {diagnostic}")
            }
            Error::DuplicateDocument { id } => write!(f, "duplicate document id '{id}'"),
            Error::UnknownNode { label } => write!(f, "no node labelled '{label}'"),
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
