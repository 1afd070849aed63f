use clouddev_aws::AwsClients;
use clouddev_core::OwnerTag;
use tracing::debug;

use super::{deleted, owner_tags};
use crate::Result;
use crate::traits::SecretStore;

pub struct SecretsManagerStore {
    aws: AwsClients,
}

impl SecretsManagerStore {
    #[must_use]
    pub fn new(aws: AwsClients) -> Self {
        Self { aws }
    }
}

impl SecretStore for SecretsManagerStore {
    fn copy_secret(&self, source_name: &str, dest_name: &str, owner: &OwnerTag) -> Result<String> {
        let value = self.aws.get_secret_string(source_name)?;
        let created = self.aws.create_secret(dest_name, &value, &owner_tags(owner))?;
        debug!(source = source_name, arn = %created.arn, "secret copied");
        Ok(created.name)
    }

    fn delete_secret(&self, name: &str) -> Result<bool> {
        deleted(self.aws.delete_secret(name))
    }
}
