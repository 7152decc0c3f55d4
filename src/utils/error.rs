use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to remove {}: {source}", .path.display())]
    CleanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Packaging tool not found: {program}")]
    PackagerNotFound { program: String },

    #[error("Failed to start packaging tool {program}: {source}")]
    PackagerSpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Packaging tool {program} failed with {}", describe_exit(.code))]
    PackagerFailed { program: String, code: Option<i32> },

    #[error("Packaging tool reported success but {} was not produced", .path.display())]
    ArtifactMissing { path: PathBuf },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Filesystem,
    Packaging,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BuildError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuildError::IoError(_) | BuildError::CleanFailed { .. } => ErrorCategory::Filesystem,
            BuildError::PackagerNotFound { .. }
            | BuildError::PackagerSpawnError { .. }
            | BuildError::PackagerFailed { .. }
            | BuildError::ArtifactMissing { .. } => ErrorCategory::Packaging,
            BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. }
            | BuildError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BuildError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BuildError::SerializationError(_) => ErrorSeverity::Medium,
            BuildError::PackagerFailed { .. }
            | BuildError::ArtifactMissing { .. }
            | BuildError::CleanFailed { .. } => ErrorSeverity::High,
            BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. }
            | BuildError::MissingConfigError { .. } => ErrorSeverity::High,
            BuildError::IoError(_)
            | BuildError::PackagerNotFound { .. }
            | BuildError::PackagerSpawnError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this failure. Zero is reserved for a successful build.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::PackagerFailed { .. } | BuildError::ArtifactMissing { .. } => 1,
            BuildError::CleanFailed { .. } => 2,
            BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. }
            | BuildError::MissingConfigError { .. } => 3,
            BuildError::IoError(_)
            | BuildError::PackagerNotFound { .. }
            | BuildError::PackagerSpawnError { .. }
            | BuildError::SerializationError(_) => 4,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BuildError::CleanFailed { path, .. } => {
                format!("Could not remove old build output at {}", path.display())
            }
            BuildError::PackagerNotFound { program } => {
                format!("The packaging tool '{}' is not installed or not on PATH", program)
            }
            BuildError::PackagerSpawnError { program, .. } => {
                format!("The packaging tool '{}' could not be started", program)
            }
            BuildError::PackagerFailed { code, .. } => {
                format!("Build failed ({})", describe_exit(code))
            }
            BuildError::ArtifactMissing { path } => {
                format!("Build finished but no executable was found at {}", path.display())
            }
            BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. }
            | BuildError::MissingConfigError { .. } => format!("Invalid build configuration: {}", self),
            BuildError::IoError(e) => format!("File system error: {}", e),
            BuildError::SerializationError(e) => format!("Could not write build report: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BuildError::CleanFailed { .. } => {
                "Close any running copy of the executable or editor holding files in build/ or dist/, then retry"
            }
            BuildError::PackagerNotFound { .. } => {
                "Install it with `pip install pyinstaller` or point --packager at the right program"
            }
            BuildError::PackagerSpawnError { .. } => {
                "Check that the packaging tool is executable and the project root is accessible"
            }
            BuildError::PackagerFailed { .. } => {
                "Read the packaging tool output above; a missing module or a syntax error in the entry script is the usual cause"
            }
            BuildError::ArtifactMissing { .. } => {
                "Check the dist directory and bundle name settings match what the packaging tool writes"
            }
            BuildError::ConfigError { .. }
            | BuildError::ConfigValidationError { .. }
            | BuildError::InvalidConfigValueError { .. }
            | BuildError::MissingConfigError { .. } => "Fix the configuration file or command-line flags and retry",
            BuildError::IoError(_) => "Check file permissions and available disk space",
            BuildError::SerializationError(_) => "Check that the report path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
