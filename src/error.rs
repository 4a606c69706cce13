//! Error taxonomy for optimization requests.
//!
//! Every variant renders to a human-readable message via `Display`; the
//! service copies that message verbatim into the `message` field of an
//! error envelope.

/// Errors raised while parsing a request or running a backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizeError {
    /// Missing or malformed request, rejected before any backend runs.
    #[error("{0}")]
    InvalidInput(String),

    /// The selected backend was compiled out or its support library is absent.
    #[error("{backend} backend unavailable: missing dependency `{dependency}`. {remediation}")]
    DependencyUnavailable {
        /// Backend that was requested.
        backend: String,
        /// The library it needs.
        dependency: String,
        /// Actionable hint for the caller.
        remediation: String,
    },

    /// A parameter failed its type or range expectation.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter key as it appeared in the request.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Anything else that went wrong during search or evaluation.
    #[error("internal fault: {0}")]
    Internal(String),
}

impl OptimizeError {
    /// Shorthand for [`OptimizeError::InvalidParameter`].
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        OptimizeError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Stable short label for the error class, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizeError::InvalidInput(_) => "input",
            OptimizeError::DependencyUnavailable { .. } => "dependency",
            OptimizeError::InvalidParameter { .. } => "parameter",
            OptimizeError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for OptimizeError {
    fn from(e: serde_json::Error) -> Self {
        OptimizeError::InvalidInput(format!("malformed request JSON: {e}"))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OptimizeError>;
