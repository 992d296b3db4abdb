use thiserror::Error;

/// App errors
#[derive(Error, Debug)]
pub enum AppError {

    /// Toml parsing error
    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Config parsing error
    #[error("Failed to parse config file: {0}")]
    ConfigParseError(&'static str),

    /// Missing arguments
    #[error("Missing mandatory arguments: {0}\nTry `toolcheck --help` for more information.")]
    MissingArgError(&'static str),

    /// Incorrect argument value
    #[error("Incorrect argument value: {0}")]
    InvalidArgError(&'static str),

    /// API key is not set in the environment.
    #[error("API key for {platform} is not set, export one of: {vars}")]
    MissingApiKey {
        /// Platform display name.
        platform: &'static str,
        /// Environment variables checked.
        vars: String,
    },

    /// Library error
    #[error("{0}")]
    LibError(#[from] toolcheck_lib::Error),

    /// File system error.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Some of the platform runs failed.
    #[error("Platform checks failed: {0}")]
    ChildFailed(String),

    /// General error.
    #[error("{0}")]
    Error(String),
}

impl AppError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::Io { path: path.as_ref().display().to_string(), source }
    }
}
