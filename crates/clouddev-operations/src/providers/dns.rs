use clouddev_aws::AwsClients;
use clouddev_aws::route53::{AliasRecord, ChangeAction};

use super::deleted;
use crate::Result;
use crate::specs::AliasTarget;
use crate::traits::DnsRecords;

/// Alias records in one hosted zone.
pub struct Route53Records {
    aws: AwsClients,
    hosted_zone_id: String,
}

impl Route53Records {
    #[must_use]
    pub fn new(aws: AwsClients, hosted_zone_id: impl Into<String>) -> Self {
        Self {
            aws,
            hosted_zone_id: hosted_zone_id.into(),
        }
    }

    fn alias(name: &str, target: &AliasTarget) -> AliasRecord {
        AliasRecord {
            name: name.to_string(),
            target_dns_name: target.dns_name.clone(),
            target_hosted_zone_id: target.hosted_zone_id.clone(),
        }
    }
}

impl DnsRecords for Route53Records {
    fn record_exists(&self, name: &str) -> Result<bool> {
        Ok(self.aws.record_exists(&self.hosted_zone_id, name)?)
    }

    fn create_alias(&self, name: &str, target: &AliasTarget) -> Result<String> {
        self.aws.change_alias_record(
            &self.hosted_zone_id,
            ChangeAction::Create,
            &Self::alias(name, target),
        )?;
        Ok(name.to_string())
    }

    fn delete_alias(&self, name: &str, target: &AliasTarget) -> Result<bool> {
        deleted(self.aws.change_alias_record(
            &self.hosted_zone_id,
            ChangeAction::Delete,
            &Self::alias(name, target),
        ))
    }
}
