use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] decree_core::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl Error {
    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(inner) => inner.exit_code(),
            Self::InvalidConfig(_) | Self::ParseError(_) | Self::IoError(_) => 2,
            Self::LoggingError(_) | Self::OutputError(_) => 1,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::ParseError(err.message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
