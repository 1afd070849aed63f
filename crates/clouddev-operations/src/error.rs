use clouddev_core::{IdentityError, ListenerKind, ResourceKind};
use clouddev_saga::SagaError;
use thiserror::Error;

/// Details about a failed compensation during saga rollback.
#[derive(Debug)]
pub struct CompensationFailure {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The error that occurred during compensation.
    pub error: Box<OperationError>,
}

/// A resource the delete workflow could not remove.
#[derive(Debug)]
pub struct TeardownFailure {
    pub resource: ResourceKind,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid identity")]
    InvalidIdentity(#[from] IdentityError),

    #[error("{resource} '{name}' already exists")]
    PreflightConflict { resource: ResourceKind, name: String },

    #[error(transparent)]
    Aws(#[from] clouddev_aws::AwsError),

    #[error(transparent)]
    Image(#[from] clouddev_image::ImageError),

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("{resource} provider failed: {message}")]
    Provider {
        resource: ResourceKind,
        message: String,
    },

    #[error("{listener} listener already has a rule for host '{host}'")]
    ListenerHostTaken { listener: ListenerKind, host: String },

    #[error("health check of '{url}' failed with status {status}")]
    HealthCheckFailed { url: String, status: u16 },

    #[error("compute service '{name}' does not exist")]
    ServiceNotFound { name: String },

    #[error("create saga failed at step '{step}'")]
    SagaFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
    },

    #[error(
        "create saga failed at step '{step}' and {} compensation(s) also failed", compensation_failures.len()
    )]
    SagaCompensationFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
        compensation_failures: Vec<CompensationFailure>,
    },

    #[error("teardown left {} resource(s) behind", failures.len())]
    TeardownIncomplete { failures: Vec<TeardownFailure> },
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl OperationError {
    /// The error that started a failed create run, looking through saga wrappers.
    #[must_use]
    pub fn root_trigger(&self) -> &OperationError {
        match self {
            Self::SagaFailed { source, .. } | Self::SagaCompensationFailed { source, .. } => {
                source.root_trigger()
            }
            other => other,
        }
    }
}

impl From<SagaError<OperationError>> for OperationError {
    fn from(err: SagaError<OperationError>) -> Self {
        match err {
            SagaError::StepFailed { step, source } => Self::SagaFailed {
                step,
                source: Box::new(source),
            },
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation_errors,
            } => {
                let compensation_failures = compensation_errors
                    .into_iter()
                    .map(|e| CompensationFailure {
                        step: e.step,
                        description: e.description,
                        error: Box::new(e.error),
                    })
                    .collect();
                Self::SagaCompensationFailed {
                    step: failed_step,
                    source: Box::new(step_error),
                    compensation_failures,
                }
            }
            _ => Self::Provider {
                resource: ResourceKind::ComputeService,
                message: "saga ended in an unknown state".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clouddev_saga::CompensationError;

    use super::*;

    #[test]
    fn step_failure_maps_to_saga_failed() {
        let err: OperationError = SagaError::StepFailed {
            step: "create_target_group".to_string(),
            source: OperationError::ServiceNotFound {
                name: "svc".to_string(),
            },
        }
        .into();

        assert!(matches!(
            err,
            OperationError::SagaFailed { ref step, .. } if step == "create_target_group"
        ));
        assert!(matches!(
            err.root_trigger(),
            OperationError::ServiceNotFound { .. }
        ));
    }

    #[test]
    fn compensation_failures_are_attached_not_substituted() {
        let err: OperationError = SagaError::CompensationFailed {
            failed_step: "probe_health".to_string(),
            step_error: OperationError::HealthCheckFailed {
                url: "https://jane-billing.dev.acme.io/health".to_string(),
                status: 503,
            },
            compensation_errors: vec![CompensationError {
                step: "copy_secret".to_string(),
                description: "delete secret".to_string(),
                error: OperationError::Provider {
                    resource: ResourceKind::Secret,
                    message: "throttled".to_string(),
                },
            }],
        }
        .into();

        match &err {
            OperationError::SagaCompensationFailed {
                step,
                source,
                compensation_failures,
            } => {
                assert_eq!(step, "probe_health");
                assert!(matches!(
                    **source,
                    OperationError::HealthCheckFailed { status: 503, .. }
                ));
                assert_eq!(compensation_failures.len(), 1);
                assert_eq!(compensation_failures[0].step, "copy_secret");
            }
            other => panic!("expected SagaCompensationFailed, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "create saga failed at step 'probe_health' and 1 compensation(s) also failed"
        );
    }

    #[test]
    fn preflight_conflict_names_the_resource() {
        let err = OperationError::PreflightConflict {
            resource: ResourceKind::DnsRecord,
            name: "jane-billing.dev.acme.io".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "DNS record 'jane-billing.dev.acme.io' already exists"
        );
    }
}
