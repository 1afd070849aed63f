use std::collections::BTreeMap;

use clouddev_aws::ecs::{ContainerSpec, LogDriver, LogSettings, TaskDefinitionInput};
use clouddev_aws::{AwsClients, Tag};
use clouddev_core::ResourceKind;
use tracing::warn;

use super::owner_tags;
use crate::specs::{TaskDefinitionRef, TaskDefinitionSpec};
use crate::traits::TaskDefinitions;
use crate::{DeploymentEnvironment, DeploymentSecrets, OperationError, Result};

const LOG_ROUTER_NAME: &str = "log_router";
const LOG_ROUTER_GROUP: &str = "firelens-container";
const ELASTICSEARCH_PORT: &str = "9200";
const TASK_CPU: &str = "256";
const TASK_MEMORY: &str = "512";

/// Where the log router ships container output.
#[derive(Clone)]
pub struct LogShipping {
    pub elasticsearch_host: String,
    pub elasticsearch_user: String,
    pub elasticsearch_password: String,
    pub router_image: String,
    pub region: String,
}

impl LogShipping {
    #[must_use]
    pub fn new(env: &DeploymentEnvironment, secrets: &DeploymentSecrets) -> Self {
        Self {
            elasticsearch_host: env.elasticsearch_host.clone(),
            elasticsearch_user: env.elasticsearch_user.clone(),
            elasticsearch_password: secrets.elasticsearch_password.clone(),
            router_image: env.log_router_image.clone(),
            region: env.region.clone(),
        }
    }

    fn app_log_options(&self, index: &str) -> BTreeMap<String, String> {
        [
            ("Name", "es"),
            ("Host", self.elasticsearch_host.as_str()),
            ("Port", ELASTICSEARCH_PORT),
            ("Index", index),
            ("Logstash_Format", "true"),
            ("Logstash_Prefix", index),
            ("Logstash_DateFormat", "%Y.%m.%d"),
            ("Time_Key", "@timestamp"),
            ("Time_Key_Format", "%Y-%m-%dT%H:%M:%S"),
            ("Type", "_doc"),
            ("HTTP_User", self.elasticsearch_user.as_str()),
            ("HTTP_Passwd", self.elasticsearch_password.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn router_log_options(&self) -> BTreeMap<String, String> {
        [
            ("awslogs-group", LOG_ROUTER_GROUP),
            ("awslogs-region", self.region.as_str()),
            ("awslogs-create-group", "true"),
            ("awslogs-stream-prefix", "firelens"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

impl std::fmt::Debug for LogShipping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogShipping")
            .field("elasticsearch_host", &self.elasticsearch_host)
            .field("router_image", &self.router_image)
            .finish_non_exhaustive()
    }
}

pub struct EcsTaskDefinitions {
    aws: AwsClients,
    logs: LogShipping,
}

impl EcsTaskDefinitions {
    #[must_use]
    pub fn new(aws: AwsClients, logs: LogShipping) -> Self {
        Self { aws, logs }
    }
}

/// The app container plus a fluent-bit router shipping its output to Elasticsearch.
fn task_definition_input(logs: &LogShipping, spec: &TaskDefinitionSpec) -> TaskDefinitionInput {
    let mut tags = owner_tags(&spec.owner);
    tags.push(Tag::new("Name", &spec.family));

    let app = ContainerSpec {
        name: spec.container_name.clone(),
        image: spec.image.clone(),
        ports: vec![spec.container_port],
        environment: BTreeMap::from([("ENVIRONMENT_KEY".to_string(), spec.secret_name.clone())]),
        logging: Some(LogSettings {
            driver: LogDriver::FireLens,
            options: logs.app_log_options(&spec.log_index),
        }),
        log_router: false,
    };
    let router = ContainerSpec {
        name: LOG_ROUTER_NAME.to_string(),
        image: logs.router_image.clone(),
        logging: Some(LogSettings {
            driver: LogDriver::CloudWatch,
            options: logs.router_log_options(),
        }),
        log_router: true,
        ..ContainerSpec::default()
    };

    TaskDefinitionInput {
        family: spec.family.clone(),
        task_role_arn: spec.task_role_arn.clone(),
        execution_role_arn: spec.execution_role_arn.clone(),
        containers: vec![app, router],
        cpu: TASK_CPU.to_string(),
        memory: TASK_MEMORY.to_string(),
        tags,
    }
}

impl TaskDefinitions for EcsTaskDefinitions {
    fn register(&self, spec: &TaskDefinitionSpec) -> Result<TaskDefinitionRef> {
        let registered = self.aws.register_task_definition(&task_definition_input(&self.logs, spec))?;
        Ok(TaskDefinitionRef {
            arn: registered.task_definition_arn,
            family: registered.family,
        })
    }

    fn list_revisions(&self, family: &str) -> Result<Vec<String>> {
        Ok(self.aws.list_task_definition_revisions(family)?)
    }

    fn deregister(&self, arns: &[String]) -> Result<()> {
        let mut failed = Vec::new();
        for arn in arns {
            match self.aws.deregister_task_definition(arn) {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {}
                Err(err) => {
                    warn!(arn = %arn, error = %err, "revision not deregistered");
                    failed.push(arn.as_str());
                }
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(OperationError::Provider {
                resource: ResourceKind::TaskDefinition,
                message: format!("could not deregister {}", failed.join(", ")),
            })
        }
    }
}
