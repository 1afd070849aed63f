use clouddev_aws::ecs::CreateServiceInput;
use clouddev_aws::{AwsClients, Tag};

use super::{deleted, owner_tags};
use crate::Result;
use crate::specs::{ServiceRef, ServiceSpec};
use crate::traits::ComputeServices;

/// Services in one cluster.
pub struct EcsServices {
    aws: AwsClients,
    cluster: String,
}

impl EcsServices {
    #[must_use]
    pub fn new(aws: AwsClients, cluster: impl Into<String>) -> Self {
        Self {
            aws,
            cluster: cluster.into(),
        }
    }
}

/// One public task behind the deployment's target group.
fn create_input(spec: &ServiceSpec) -> CreateServiceInput {
    let mut tags = owner_tags(&spec.owner);
    tags.push(Tag::new("Name", &spec.service_name));

    CreateServiceInput {
        cluster: spec.cluster.clone(),
        service_name: spec.service_name.clone(),
        task_definition: spec.task_definition_arn.clone(),
        target_group_arn: spec.target_group_arn.clone(),
        container_name: spec.container_name.clone(),
        container_port: spec.container_port,
        desired_count: 1,
        subnets: vec![spec.subnet_id.clone()],
        security_groups: vec![spec.security_group_id.clone()],
        assign_public_ip: true,
        tags,
    }
}

impl ComputeServices for EcsServices {
    fn service_exists(&self, name: &str) -> Result<bool> {
        Ok(self.aws.service_exists(&self.cluster, name)?)
    }

    fn create(&self, spec: &ServiceSpec) -> Result<ServiceRef> {
        let service = self.aws.create_service(&create_input(spec))?;
        Ok(ServiceRef {
            name: service.service_name,
            arn: service.service_arn,
        })
    }

    fn force_redeploy(&self, name: &str, task_definition_arn: &str) -> Result<()> {
        Ok(self
            .aws
            .force_new_deployment(&self.cluster, name, task_definition_arn)?)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        deleted(self.aws.delete_service(&self.cluster, name))
    }
}
