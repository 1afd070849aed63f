use std::sync::Arc;

use clouddev_core::{DeploymentNames, UserIdentity};

use crate::Result;
use crate::environment::DeploymentEnvironment;
use crate::traits::{
    ComputeServices, ContainerRegistry, DnsRecords, HealthProbe, ImageBuilder, ListenerRules,
    LogIndex, SecretStore, TargetGroups, TaskDefinitions,
};

/// Every provider a workflow may call, built once per invocation.
#[derive(Clone)]
pub struct ProviderSet {
    pub registry: Arc<dyn ContainerRegistry>,
    pub secrets: Arc<dyn SecretStore>,
    pub task_definitions: Arc<dyn TaskDefinitions>,
    pub target_groups: Arc<dyn TargetGroups>,
    pub dns: Arc<dyn DnsRecords>,
    pub https_rules: Arc<dyn ListenerRules>,
    pub http_rules: Arc<dyn ListenerRules>,
    pub services: Arc<dyn ComputeServices>,
    pub log_index: Arc<dyn LogIndex>,
    pub health: Arc<dyn HealthProbe>,
    pub images: Arc<dyn ImageBuilder>,
}

/// Validates the owner and derives the names every workflow agrees on.
///
/// # Errors
///
/// Returns `InvalidIdentity` if `email` is not a company address.
pub fn resolve_names(
    env: &DeploymentEnvironment,
    email: &str,
    app_name: &str,
) -> Result<(UserIdentity, DeploymentNames)> {
    let identity = UserIdentity::parse(email, &env.company_domain)?;
    let names = DeploymentNames::derive(&identity, app_name, &env.hosted_zone_domain);
    Ok((identity, names))
}
