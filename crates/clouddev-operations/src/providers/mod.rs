//! Providers backed by the AWS SDK, the `docker` client and plain HTTP.

mod dns;
mod health;
mod image;
mod kibana;
mod listener_rules;
mod registry;
mod secrets;
mod services;
mod target_groups;
mod task_definitions;
#[cfg(test)]
mod test_server;

use clouddev_aws::Tag;
use clouddev_core::OwnerTag;

pub use dns::Route53Records;
pub use health::HttpsHealthProbe;
pub use image::DockerImageBuilder;
pub use kibana::KibanaLogIndex;
pub use listener_rules::ElbListenerRules;
pub use registry::EcrRegistry;
pub use secrets::SecretsManagerStore;
pub use services::EcsServices;
pub use target_groups::ElbTargetGroups;
pub use task_definitions::{EcsTaskDefinitions, LogShipping};

fn owner_tags(owner: &OwnerTag) -> Vec<Tag> {
    owner
        .pairs()
        .into_iter()
        .map(|(key, value)| Tag::new(key, value))
        .collect()
}

/// Maps a delete call to whether the resource existed; "not found" is not a failure.
fn deleted(result: clouddev_aws::Result<()>) -> crate::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use clouddev_aws::AwsError;

    use super::*;

    #[test]
    fn owner_tags_use_aws_spelling() {
        let tags = owner_tags(&OwnerTag::new("jane@acme.com"));
        assert_eq!(
            tags,
            vec![Tag::new("UserName", "jane@acme.com"), Tag::new("pod", "cloud-dev")]
        );
    }

    #[test]
    fn not_found_deletes_report_absent() -> anyhow::Result<()> {
        let missing = Err(AwsError::NotFound {
            operation: "DeleteRepository",
            source: "repository billing does not exist".into(),
        });
        assert!(!deleted(missing)?);
        assert!(deleted(Ok(()))?);
        Ok(())
    }

    #[test]
    fn other_delete_failures_propagate() {
        let denied = Err(AwsError::Service {
            operation: "DeleteRepository",
            source: "access denied".into(),
        });
        assert!(deleted(denied).is_err());
    }
}
