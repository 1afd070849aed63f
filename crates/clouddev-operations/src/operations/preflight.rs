use clouddev_core::{DeploymentNames, ResourceKind};
use tracing::{debug, error};

use super::ProviderSet;
use crate::{OperationError, Result};

/// Read-only uniqueness checks run before anything is created.
///
/// # Errors
///
/// Returns `PreflightConflict` naming the first resource that already exists,
/// or the provider error if a check could not be made.
pub fn run_preflight(providers: &ProviderSet, names: &DeploymentNames) -> Result<()> {
    if providers.services.service_exists(&names.service_name)? {
        return conflict(ResourceKind::ComputeService, &names.service_name);
    }
    if providers.registry.repository_exists(&names.repository_name)? {
        return conflict(ResourceKind::Repository, &names.repository_name);
    }
    if providers.dns.record_exists(&names.full_domain_name)? {
        return conflict(ResourceKind::DnsRecord, &names.full_domain_name);
    }
    debug!(service = %names.service_name, "preflight passed");
    Ok(())
}

fn conflict(resource: ResourceKind, name: &str) -> Result<()> {
    error!(resource = %resource, name, "preflight conflict");
    Err(OperationError::PreflightConflict {
        resource,
        name: name.to_string(),
    })
}
