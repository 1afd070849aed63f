use crate::Result;
use crate::specs::{ServiceRef, ServiceSpec};

pub trait ComputeServices: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the cluster cannot be queried.
    fn service_exists(&self, name: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the service cannot be created.
    fn create(&self, spec: &ServiceSpec) -> Result<ServiceRef>;

    /// Points the service at `task_definition_arn` and starts a new deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be updated.
    fn force_redeploy(&self, name: &str, task_definition_arn: &str) -> Result<()>;

    /// Returns `false` if the service did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the service exists but cannot be deleted.
    fn delete(&self, name: &str) -> Result<bool>;
}
