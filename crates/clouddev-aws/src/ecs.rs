//! Elastic Container Service: task definitions and services.

use std::collections::BTreeMap;

use aws_sdk_ecs::operation::delete_service::DeleteServiceError;
use aws_sdk_ecs::operation::deregister_task_definition::DeregisterTaskDefinitionError;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, Compatibility, CpuArchitecture, FirelensConfiguration,
    FirelensConfigurationType, KeyValuePair, LaunchType, LoadBalancer, LogConfiguration,
    NetworkConfiguration, NetworkMode, OsFamily, PortMapping, PropagateTags, RuntimePlatform,
    TransportProtocol,
};

use crate::error::{AwsError, Result, service_error};
use crate::{AwsClients, Tag};

/// How a container's output leaves the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDriver {
    /// Routed through the task's FireLens log router.
    FireLens,
    /// Straight to CloudWatch Logs.
    CloudWatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub driver: LogDriver,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// TCP ports published on the same port of the task's interface.
    pub ports: Vec<u16>,
    pub environment: BTreeMap<String, String>,
    pub logging: Option<LogSettings>,
    /// Runs this container as the task's fluent-bit FireLens router.
    pub log_router: bool,
}

impl ContainerSpec {
    fn to_sdk(&self) -> Result<aws_sdk_ecs::types::ContainerDefinition> {
        let log_configuration = match &self.logging {
            Some(logging) => Some(
                LogConfiguration::builder()
                    .log_driver(match logging.driver {
                        LogDriver::FireLens => aws_sdk_ecs::types::LogDriver::Awsfirelens,
                        LogDriver::CloudWatch => aws_sdk_ecs::types::LogDriver::Awslogs,
                    })
                    .set_options(Some(logging.options.clone().into_iter().collect()))
                    .build()?,
            ),
            None => None,
        };
        let firelens = if self.log_router {
            Some(
                FirelensConfiguration::builder()
                    .r#type(FirelensConfigurationType::Fluentbit)
                    .build()?,
            )
        } else {
            None
        };

        Ok(aws_sdk_ecs::types::ContainerDefinition::builder()
            .name(&self.name)
            .image(&self.image)
            .essential(true)
            .set_port_mappings(Some(
                self.ports
                    .iter()
                    .map(|&port| {
                        PortMapping::builder()
                            .container_port(i32::from(port))
                            .host_port(i32::from(port))
                            .protocol(TransportProtocol::Tcp)
                            .build()
                    })
                    .collect(),
            ))
            .set_environment(Some(
                self.environment
                    .iter()
                    .map(|(name, value)| KeyValuePair::builder().name(name).value(value).build())
                    .collect(),
            ))
            .set_log_configuration(log_configuration)
            .set_firelens_configuration(firelens)
            .build())
    }
}

/// A Fargate task definition in `awsvpc` mode on x86-64 Linux.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinitionInput {
    pub family: String,
    pub task_role_arn: String,
    pub execution_role_arn: String,
    pub containers: Vec<ContainerSpec>,
    pub cpu: String,
    pub memory: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub task_definition_arn: String,
    pub family: String,
    pub revision: u32,
}

/// A service running one task definition behind one target group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateServiceInput {
    pub cluster: String,
    pub service_name: String,
    pub task_definition: String,
    pub target_group_arn: String,
    pub container_name: String,
    pub container_port: u16,
    pub desired_count: u32,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: bool,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub service_name: String,
    pub service_arn: String,
}

fn ecs_tags(tags: &[Tag]) -> Vec<aws_sdk_ecs::types::Tag> {
    tags.iter()
        .map(|tag| {
            aws_sdk_ecs::types::Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build()
        })
        .collect()
}

/// Family name carried by a task-definition ARN (`...:task-definition/{family}:{revision}`).
#[must_use]
pub fn task_definition_family(arn: &str) -> Option<&str> {
    let (_, tail) = arn.rsplit_once(":task-definition/")?;
    let (family, _revision) = tail.rsplit_once(':')?;
    Some(family)
}

fn revision_was_missing(err: &DeregisterTaskDefinitionError) -> bool {
    match err {
        DeregisterTaskDefinitionError::ClientException(exception) => exception
            .message()
            .is_some_and(|message| message.contains("Unable to describe task definition")),
        _ => false,
    }
}

impl AwsClients {
    pub fn register_task_definition(&self, input: &TaskDefinitionInput) -> Result<TaskDefinition> {
        let containers = input
            .containers
            .iter()
            .map(ContainerSpec::to_sdk)
            .collect::<Result<Vec<_>>>()?;
        let output = self
            .block_on(
                self.ecs
                    .register_task_definition()
                    .family(&input.family)
                    .task_role_arn(&input.task_role_arn)
                    .execution_role_arn(&input.execution_role_arn)
                    .network_mode(NetworkMode::Awsvpc)
                    .requires_compatibilities(Compatibility::Fargate)
                    .runtime_platform(
                        RuntimePlatform::builder()
                            .cpu_architecture(CpuArchitecture::X8664)
                            .operating_system_family(OsFamily::Linux)
                            .build(),
                    )
                    .cpu(&input.cpu)
                    .memory(&input.memory)
                    .set_container_definitions(Some(containers))
                    .set_tags(Some(ecs_tags(&input.tags)))
                    .send(),
            )
            .map_err(|err| AwsError::service("RegisterTaskDefinition", err.into_service_error()))?;

        let registered = output.task_definition().ok_or(AwsError::MissingField {
            operation: "RegisterTaskDefinition",
            what: "task definition",
        })?;
        Ok(TaskDefinition {
            task_definition_arn: registered
                .task_definition_arn()
                .unwrap_or_default()
                .to_string(),
            family: registered.family().unwrap_or_default().to_string(),
            revision: u32::try_from(registered.revision()).unwrap_or_default(),
        })
    }

    /// Active revision ARNs registered under exactly `family`.
    pub fn list_task_definition_revisions(&self, family: &str) -> Result<Vec<String>> {
        let mut revisions = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .block_on(
                    self.ecs
                        .list_task_definitions()
                        .family_prefix(family)
                        .set_next_token(next_token.take())
                        .send(),
                )
                .map_err(|err| AwsError::service("ListTaskDefinitions", err.into_service_error()))?;
            revisions.extend(
                page.task_definition_arns()
                    .iter()
                    .filter(|arn| task_definition_family(arn) == Some(family))
                    .cloned(),
            );
            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(revisions)
    }

    pub fn deregister_task_definition(&self, arn: &str) -> Result<()> {
        self.block_on(
            self.ecs
                .deregister_task_definition()
                .task_definition(arn)
                .send(),
        )
        .map_err(|err| {
            service_error(
                "DeregisterTaskDefinition",
                err.into_service_error(),
                revision_was_missing,
            )
        })?;
        Ok(())
    }

    pub fn list_services(&self, cluster: &str) -> Result<Vec<String>> {
        let mut arns = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .block_on(
                    self.ecs
                        .list_services()
                        .cluster(cluster)
                        .set_next_token(next_token.take())
                        .send(),
                )
                .map_err(|err| AwsError::service("ListServices", err.into_service_error()))?;
            arns.extend(page.service_arns().iter().cloned());
            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(arns)
    }

    /// Whether `cluster` has a service called `service_name`.
    pub fn service_exists(&self, cluster: &str, service_name: &str) -> Result<bool> {
        let suffix = format!("/{service_name}");
        Ok(self
            .list_services(cluster)?
            .iter()
            .any(|arn| arn.ends_with(&suffix)))
    }

    pub fn create_service(&self, input: &CreateServiceInput) -> Result<Service> {
        let network = AwsVpcConfiguration::builder()
            .set_subnets(Some(input.subnets.clone()))
            .set_security_groups(Some(input.security_groups.clone()))
            .assign_public_ip(if input.assign_public_ip {
                AssignPublicIp::Enabled
            } else {
                AssignPublicIp::Disabled
            })
            .build()?;
        let output = self
            .block_on(
                self.ecs
                    .create_service()
                    .cluster(&input.cluster)
                    .service_name(&input.service_name)
                    .task_definition(&input.task_definition)
                    .load_balancers(
                        LoadBalancer::builder()
                            .target_group_arn(&input.target_group_arn)
                            .container_name(&input.container_name)
                            .container_port(i32::from(input.container_port))
                            .build(),
                    )
                    .desired_count(i32::try_from(input.desired_count).unwrap_or(i32::MAX))
                    .launch_type(LaunchType::Fargate)
                    .network_configuration(
                        NetworkConfiguration::builder()
                            .awsvpc_configuration(network)
                            .build(),
                    )
                    .propagate_tags(PropagateTags::TaskDefinition)
                    .set_tags(Some(ecs_tags(&input.tags)))
                    .send(),
            )
            .map_err(|err| AwsError::service("CreateService", err.into_service_error()))?;

        let service = output.service().ok_or(AwsError::MissingField {
            operation: "CreateService",
            what: "service",
        })?;
        Ok(Service {
            service_name: service.service_name().unwrap_or_default().to_string(),
            service_arn: service.service_arn().unwrap_or_default().to_string(),
        })
    }

    /// Point the service at `task_definition` and force a new deployment.
    pub fn force_new_deployment(
        &self,
        cluster: &str,
        service: &str,
        task_definition: &str,
    ) -> Result<()> {
        self.block_on(
            self.ecs
                .update_service()
                .cluster(cluster)
                .service(service)
                .task_definition(task_definition)
                .force_new_deployment(true)
                .send(),
        )
        .map_err(|err| AwsError::service("UpdateService", err.into_service_error()))?;
        Ok(())
    }

    /// Delete a service without scaling it down first.
    pub fn delete_service(&self, cluster: &str, service: &str) -> Result<()> {
        self.block_on(
            self.ecs
                .delete_service()
                .cluster(cluster)
                .service(service)
                .force(true)
                .send(),
        )
        .map_err(|err| {
            service_error(
                "DeleteService",
                err.into_service_error(),
                DeleteServiceError::is_service_not_found_exception,
            )
        })?;
        Ok(())
    }
}
