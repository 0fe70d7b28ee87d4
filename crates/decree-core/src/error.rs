//! Error types for decree-core

use thiserror::Error;

/// Core error type for registration, inference and dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A primary name is already taken in its namespace
    #[error("Name collision: '{name}' is already registered in the {scope} namespace")]
    NameCollision { name: String, scope: String },

    /// An alias clashes with a primary name or another alias
    #[error("Alias collision: '{alias}' is already registered in the {scope} namespace")]
    AliasCollision { alias: String, scope: String },

    /// Action function identifier has no `<prefix>_<action>` shape
    #[error("Malformed action name '{0}': expected '<command>_<action>'")]
    MalformedActionName(String),

    /// Dispatch or registration target is not in the registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Parameter list cannot be turned into a grammar
    #[error("Invalid signature for '{function}': {reason}")]
    InvalidSignature { function: String, reason: String },

    /// Keyword argument missing or of an unexpected type
    #[error("Bad argument '{name}': expected {expected}")]
    BadArgument { name: String, expected: &'static str },
}

impl Error {
    pub(crate) fn invalid_signature(function: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    /// Exit code for the process when this error reaches the entry point.
    ///
    /// - 1: definition or user error
    /// - 3: not found
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandNotFound(_) => 3,
            Self::NameCollision { .. }
            | Self::AliasCollision { .. }
            | Self::MalformedActionName(_)
            | Self::InvalidSignature { .. }
            | Self::BadArgument { .. } => 1,
        }
    }
}

/// Result type alias for decree-core operations
pub type Result<T> = std::result::Result<T, Error>;
