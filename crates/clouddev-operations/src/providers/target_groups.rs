use clouddev_aws::AwsClients;
use clouddev_aws::elbv2::CreateTargetGroupInput;

use super::{deleted, owner_tags};
use crate::Result;
use crate::specs::{TargetGroupRef, TargetGroupSpec};
use crate::traits::TargetGroups;

const HEALTH_CHECK_INTERVAL_SECS: u32 = 120;
const HEALTH_CHECK_TIMEOUT_SECS: u32 = 60;

pub struct ElbTargetGroups {
    aws: AwsClients,
}

impl ElbTargetGroups {
    #[must_use]
    pub fn new(aws: AwsClients) -> Self {
        Self { aws }
    }
}

fn create_input(spec: &TargetGroupSpec) -> CreateTargetGroupInput {
    CreateTargetGroupInput {
        name: spec.name.clone(),
        port: spec.port,
        vpc_id: spec.vpc_id.clone(),
        health_check_path: spec.health_check_path.clone(),
        health_check_interval_seconds: HEALTH_CHECK_INTERVAL_SECS,
        health_check_timeout_seconds: HEALTH_CHECK_TIMEOUT_SECS,
        healthy_threshold_count: 3,
        unhealthy_threshold_count: 2,
        success_codes: "200".to_string(),
        tags: owner_tags(&spec.owner),
    }
}

impl TargetGroups for ElbTargetGroups {
    fn create(&self, spec: &TargetGroupSpec) -> Result<TargetGroupRef> {
        let group = self.aws.create_target_group(&create_input(spec))?;
        Ok(TargetGroupRef {
            arn: group.target_group_arn,
            name: group.target_group_name,
        })
    }

    fn lookup(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .aws
            .describe_target_group(name)?
            .map(|group| group.target_group_arn))
    }

    fn delete(&self, arn: &str) -> Result<bool> {
        deleted(self.aws.delete_target_group(arn))
    }
}

#[cfg(test)]
mod tests {
    use clouddev_aws::Tag;
    use clouddev_core::OwnerTag;

    use super::*;

    #[test]
    fn target_group_is_checked_slowly_on_the_configured_path() {
        let input = create_input(&TargetGroupSpec {
            name: "janebilling".to_string(),
            port: 8080,
            health_check_path: "/health".to_string(),
            vpc_id: "vpc-1".to_string(),
            owner: OwnerTag::new("jane@acme.com"),
        });

        assert_eq!(input.port, 8080);
        assert_eq!(input.health_check_path, "/health");
        assert_eq!(input.health_check_interval_seconds, 120);
        assert_eq!(input.health_check_timeout_seconds, 60);
        assert_eq!(input.success_codes, "200");
        assert_eq!(input.tags[0], Tag::new("UserName", "jane@acme.com"));
    }
}
