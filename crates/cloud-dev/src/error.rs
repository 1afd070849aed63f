use std::path::PathBuf;

use clouddev_core::Operation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read configuration '{}'", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration '{}'", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "AWS credentials not found: set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY, or AWS_PROFILE"
    )]
    MissingAwsCredentials,

    #[error("'{operation}' requires {flag}")]
    MissingArgument {
        operation: Operation,
        flag: &'static str,
    },

    #[error("{operation} failed")]
    Operation {
        operation: Operation,
        #[source]
        source: clouddev_operations::OperationError,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
