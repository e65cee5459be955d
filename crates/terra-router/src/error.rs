use thiserror::Error;

/// Route registration and link-building errors
///
/// These are programming mistakes (bad patterns, duplicate or unknown keys),
/// reported at the call site rather than surfaced to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("route key '{key}' is already defined")]
    DuplicateKey { key: String },

    #[error("no route defined for key '{key}' (available: {})", .available.join(", "))]
    UnknownKey { key: String, available: Vec<String> },

    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("missing parameter '{param}' for path pattern '{pattern}'")]
    MissingParam { pattern: String, param: String },
}

pub type Result<T> = std::result::Result<T, RouterError>;
