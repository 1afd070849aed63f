use clouddev_aws::AwsClients;
use clouddev_core::OwnerTag;

use super::{deleted, owner_tags};
use crate::Result;
use crate::specs::RepositoryRef;
use crate::traits::ContainerRegistry;

pub struct EcrRegistry {
    aws: AwsClients,
}

impl EcrRegistry {
    #[must_use]
    pub fn new(aws: AwsClients) -> Self {
        Self { aws }
    }
}

impl ContainerRegistry for EcrRegistry {
    fn repository_exists(&self, name: &str) -> Result<bool> {
        Ok(self.aws.describe_repository(name)?.is_some())
    }

    fn create_repository(&self, name: &str, owner: &OwnerTag) -> Result<RepositoryRef> {
        let repository = self.aws.create_repository(name, &owner_tags(owner))?;
        Ok(RepositoryRef {
            name: repository.repository_name,
            uri: repository.repository_uri,
        })
    }

    fn delete_repository(&self, name: &str) -> Result<bool> {
        deleted(self.aws.delete_repository(name))
    }
}
