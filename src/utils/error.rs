use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Could not find test file: assets/{name}")]
    AssetNotFound { name: String },

    #[error("Invalid asset name '{name}': {reason}")]
    InvalidAssetName { name: String, reason: String },

    #[error("{file_name}: {source}")]
    CopyFailed {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Scratch directory error at {}: {source}", .path.display())]
    ScratchDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    BackendError(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Asset,
    Io,
    Backend,
    Configuration,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl FixtureError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FixtureError::AssetNotFound { .. } | FixtureError::InvalidAssetName { .. } => {
                ErrorCategory::Asset
            }
            FixtureError::CopyFailed { .. }
            | FixtureError::ScratchDirError { .. }
            | FixtureError::IoError(_) => ErrorCategory::Io,
            FixtureError::BackendError(_) => ErrorCategory::Backend,
            FixtureError::SerializationError(_) => ErrorCategory::Serialization,
            FixtureError::ConfigError { .. }
            | FixtureError::ConfigValidationError { .. }
            | FixtureError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // copy failures have already been retried; another run may succeed
            FixtureError::CopyFailed { .. } => ErrorSeverity::Medium,
            FixtureError::AssetNotFound { .. }
            | FixtureError::InvalidAssetName { .. }
            | FixtureError::BackendError(_)
            | FixtureError::SerializationError(_)
            | FixtureError::ConfigError { .. }
            | FixtureError::ConfigValidationError { .. }
            | FixtureError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            FixtureError::ScratchDirError { .. } | FixtureError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Whether the copier should try the operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FixtureError::CopyFailed { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FixtureError::AssetNotFound { .. } => {
                "Check that the asset exists under the 'assets' directory of the resource root"
            }
            FixtureError::InvalidAssetName { .. } => {
                "Use a plain file name without path separators"
            }
            FixtureError::CopyFailed { .. } => {
                "Check free space and permissions of the cache directory, then retry"
            }
            FixtureError::ScratchDirError { .. } => {
                "Make sure the cache directory is writable and not held open by another process"
            }
            FixtureError::IoError(_) => "Check file system permissions and available space",
            FixtureError::BackendError(_) => {
                "Verify the staged file is a valid database and the query matches its schema"
            }
            FixtureError::SerializationError(_) => "Report this as a bug",
            FixtureError::ConfigError { .. }
            | FixtureError::ConfigValidationError { .. }
            | FixtureError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line overrides"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FixtureError::AssetNotFound { name } => format!("Test asset '{}' was not found", name),
            FixtureError::CopyFailed { file_name, .. } => {
                format!("Could not copy '{}' after several attempts", file_name)
            }
            FixtureError::BackendError(e) => format!("Database backend failed: {}", e),
            other => other.to_string(),
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;
