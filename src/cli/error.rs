//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::traits::OracleError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Render(_) => crate::exitcode::SOFTWARE,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                    crate::exitcode::NOINPUT
                }
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::GraphFormat { .. } | InfraError::EdgeFormat { .. } => {
                    crate::exitcode::DATAERR
                }
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Oracle(OracleError::Transport { .. }) => {
                        crate::exitcode::UNAVAILABLE
                    }
                    ApplicationError::Oracle(_) => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
