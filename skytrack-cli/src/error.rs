//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use skytrack::config::ConfigFileError;
use skytrack::persistence::PersistenceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to load or store a flight
    Persistence(PersistenceError),
    /// The simulator connection could not be established or was lost
    Connection(String),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Persistence(PersistenceError::NotFound(_)) => {
                eprintln!();
                eprintln!("Stored flights live in the storage directory:");
                eprintln!("  skytrack config get storage.directory");
            }
            CliError::Persistence(PersistenceError::MalformedSample { .. }) => {
                eprintln!();
                eprintln!("Nothing was imported. Fix or remove the sample and try again.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Persistence(e) => write!(f, "{}", e),
            CliError::Connection(msg) => write!(f, "Simulator connection error: {}", msg),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Persistence(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PersistenceError> for CliError {
    fn from(e: PersistenceError) -> Self {
        CliError::Persistence(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let error = CliError::InvalidArgument("speed must be positive".to_string());
        assert_eq!(error.to_string(), "Invalid argument: speed must be positive");

        let error: CliError = PersistenceError::NotFound(4).into();
        assert_eq!(error.to_string(), "Flight 4 not found");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let error = CliError::FileWrite {
            path: PathBuf::from("/tmp/out.json"),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.source().is_some());
        assert!(CliError::Config("bad".to_string()).source().is_none());
    }
}
