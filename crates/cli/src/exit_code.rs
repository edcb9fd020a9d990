//! Exit codes for the typegen CLI.
//!
//! Distinct codes let scripts and CI systems tell a bad config apart from an
//! unusable schema or a failed write.

use graphql_config::ConfigError;
use graphql_introspect::IntrospectionError;
use graphql_schema::SchemaError;

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no errors
    Success = 0,
    /// Configuration error (missing or invalid config file)
    ConfigError = 2,
    /// Schema error (fetch failed, cache missing, configured type or field unknown)
    SchemaError = 3,
    /// I/O error (file read/write failure)
    IoError = 4,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Classifies a command failure by the first typed error in its chain.
    ///
    /// Errors raised directly by the CLI (no config found, unknown package)
    /// are configuration errors.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if cause.is::<ConfigError>() {
                return Self::ConfigError;
            }
            if let Some(schema_error) = cause.downcast_ref::<SchemaError>() {
                return match schema_error {
                    SchemaError::Io { .. } => Self::IoError,
                    _ => Self::SchemaError,
                };
            }
            if cause.is::<IntrospectionError>() {
                return Self::SchemaError;
            }
            if cause.is::<std::io::Error>() {
                return Self::IoError;
            }
        }
        Self::ConfigError
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
