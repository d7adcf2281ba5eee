//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The project file is not valid JSON or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The `weft.toml` settings file could not be parsed.
    #[error("failed to parse build settings: {0}")]
    SettingsError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Sources were requested from the file list, but the project has none.
    #[error("sources can only be resolved when the project file has a 'files' list; glob the sources instead")]
    MissingFileList,
}
