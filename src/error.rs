use thiserror::Error;

/// Main error type for the billboard patcher library
#[derive(Error, Debug)]
pub enum PatcherError {
    #[error("Missing input: {path} ({reason})")]
    MissingInput { path: String, reason: String },

    #[error("Invalid dimensions: {details}")]
    InvalidDimensions { details: String },

    #[error("Unknown billboard: {name}")]
    UnknownTarget { name: String },

    #[error("Unknown frame style: {name}")]
    UnknownStyle { name: String },

    #[error("Failed to write image {path}: {reason}")]
    Encode { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} - {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using PatcherError
pub type Result<T> = std::result::Result<T, PatcherError>;

impl PatcherError {
    pub fn missing_input<P: AsRef<std::path::Path>, S: ToString>(path: P, reason: S) -> Self {
        Self::MissingInput {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_dimensions<S: Into<String>>(details: S) -> Self {
        Self::InvalidDimensions { details: details.into() }
    }

    /// Whether this error only aborts the current job, letting the run continue
    /// with the remaining ones.
    pub fn is_item_skippable(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::InvalidDimensions { .. } | Self::UnknownTarget { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput { path, .. } => {
                format!("Could not load image '{}'. Please check the file exists and is a PNG or JPEG.", path)
            }
            Self::UnknownTarget { name } => {
                format!("Billboard '{}' is not in the configured table. Run `billboard-patcher list` to see it.", name)
            }
            Self::UnknownStyle { name } => {
                format!("Frame style '{}' not found. Available styles: reference, pixel-art", name)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
