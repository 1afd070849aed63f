use std::error::Error as StdError;

use aws_sdk_ecs::error::BuildError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum AwsError {
    #[error("failed to start the AWS client runtime")]
    Runtime(#[source] std::io::Error),

    #[error("{operation}: the resource does not exist")]
    NotFound {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{operation} failed")]
    Service {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("could not assemble the request")]
    Request(#[from] BuildError),

    #[error("{operation} returned no {what}")]
    MissingField {
        operation: &'static str,
        what: &'static str,
    },
}

impl AwsError {
    /// Whether the failure means the addressed resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn service<E>(operation: &'static str, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Service {
            operation,
            source: Box::new(err),
        }
    }
}

/// Wraps a modelled service error, as [`AwsError::NotFound`] when `missing` says so.
pub(crate) fn service_error<E>(
    operation: &'static str,
    err: E,
    missing: impl FnOnce(&E) -> bool,
) -> AwsError
where
    E: StdError + Send + Sync + 'static,
{
    if missing(&err) {
        AwsError::NotFound {
            operation,
            source: Box::new(err),
        }
    } else {
        AwsError::service(operation, err)
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
