//! Provider-neutral descriptions of the resources a deployment creates.

use clouddev_core::{DeploymentNames, OwnerTag};

use crate::environment::{DeploymentEnvironment, DeploymentRequest};

/// Task definition for the app container plus its log router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinitionSpec {
    pub family: String,
    pub container_name: String,
    /// Image reference including the tag.
    pub image: String,
    pub container_port: u16,
    /// Exposed to the app as `ENVIRONMENT_KEY`.
    pub secret_name: String,
    /// Elasticsearch index and logstash prefix for the app's logs.
    pub log_index: String,
    pub task_role_arn: String,
    pub execution_role_arn: String,
    pub owner: OwnerTag,
}

impl TaskDefinitionSpec {
    /// Shared by `create` and `update`, so every revision has one shape.
    #[must_use]
    pub fn derive(
        env: &DeploymentEnvironment,
        names: &DeploymentNames,
        request: &DeploymentRequest,
        registry_uri: &str,
    ) -> Self {
        Self {
            family: names.task_family.clone(),
            container_name: names.app_name.clone(),
            image: format!("{registry_uri}:latest"),
            container_port: request.container_port,
            secret_name: names.secret_name.clone(),
            log_index: names.app_name.clone(),
            task_role_arn: env.role_arn(&env.task_role_name),
            execution_role_arn: env.role_arn(&env.execution_role_name),
            owner: OwnerTag::new(&request.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroupSpec {
    pub name: String,
    pub port: u16,
    /// Absolute path, always starting with `/`.
    pub health_check_path: String,
    pub vpc_id: String,
    pub owner: OwnerTag,
}

impl TargetGroupSpec {
    #[must_use]
    pub fn derive(
        env: &DeploymentEnvironment,
        names: &DeploymentNames,
        request: &DeploymentRequest,
    ) -> Self {
        Self {
            name: names.target_group_name.clone(),
            port: request.container_port,
            health_check_path: format!("/{}", request.health_check_path.trim_start_matches('/')),
            vpc_id: env.vpc_id.clone(),
            owner: OwnerTag::new(&request.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub cluster: String,
    pub service_name: String,
    pub task_definition_arn: String,
    pub target_group_arn: String,
    pub container_name: String,
    pub container_port: u16,
    pub subnet_id: String,
    pub security_group_id: String,
    pub owner: OwnerTag,
}

/// Where every deployment's DNS alias points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTarget {
    pub dns_name: String,
    pub hosted_zone_id: String,
}

impl AliasTarget {
    #[must_use]
    pub fn load_balancer(env: &DeploymentEnvironment) -> Self {
        Self {
            dns_name: env.load_balancer_dns_name.clone(),
            hosted_zone_id: env.load_balancer_zone_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinitionRef {
    pub arn: String,
    pub family: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroupRef {
    pub arn: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRef {
    pub name: String,
    pub arn: String,
}

/// Source and destination of one image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuildRequest {
    pub source_repository: String,
    pub branch: String,
    pub image_name: String,
    pub registry_uri: String,
}
