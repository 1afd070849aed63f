//! Route 53 alias records.

use aws_sdk_route53::operation::change_resource_record_sets::ChangeResourceRecordSetsError;
use aws_sdk_route53::types::{AliasTarget, Change, ChangeBatch, ResourceRecordSet, RrType};

use crate::AwsClients;
use crate::error::{AwsError, Result, service_error};

const CHANGE_COMMENT: &str = "cloud-dev environment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Create,
    Delete,
    Upsert,
}

impl From<ChangeAction> for aws_sdk_route53::types::ChangeAction {
    fn from(action: ChangeAction) -> Self {
        match action {
            ChangeAction::Create => Self::Create,
            ChangeAction::Delete => Self::Delete,
            ChangeAction::Upsert => Self::Upsert,
        }
    }
}

/// An `A` alias record pointing at a load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    pub name: String,
    pub target_dns_name: String,
    pub target_hosted_zone_id: String,
}

impl AliasRecord {
    fn record_set(&self) -> Result<ResourceRecordSet> {
        let alias = AliasTarget::builder()
            .hosted_zone_id(&self.target_hosted_zone_id)
            .dns_name(&self.target_dns_name)
            .evaluate_target_health(false)
            .build()?;
        Ok(ResourceRecordSet::builder()
            .name(&self.name)
            .r#type(RrType::A)
            .alias_target(alias)
            .build()?)
    }

    fn change(&self, action: ChangeAction) -> Result<Change> {
        Ok(Change::builder()
            .action(action.into())
            .resource_record_set(self.record_set()?)
            .build()?)
    }
}

fn fully_qualified(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

/// Route 53 reports deleting an absent record as an invalid batch.
fn record_was_missing(err: &ChangeResourceRecordSetsError) -> bool {
    match err {
        ChangeResourceRecordSetsError::InvalidChangeBatch(batch) => batch
            .messages()
            .iter()
            .map(String::as_str)
            .chain(batch.message())
            .any(|message| message.contains("not found")),
        _ => false,
    }
}

impl AwsClients {
    /// Whether the zone holds any record named exactly `name`.
    pub fn record_exists(&self, hosted_zone_id: &str, name: &str) -> Result<bool> {
        let fqdn = fully_qualified(name);
        let output = self
            .block_on(
                self.route53
                    .list_resource_record_sets()
                    .hosted_zone_id(hosted_zone_id)
                    .start_record_name(&fqdn)
                    .send(),
            )
            .map_err(|err| AwsError::service("ListResourceRecordSets", err.into_service_error()))?;
        Ok(output
            .resource_record_sets()
            .iter()
            .any(|record| record.name().eq_ignore_ascii_case(&fqdn)))
    }

    pub fn change_alias_record(
        &self,
        hosted_zone_id: &str,
        action: ChangeAction,
        record: &AliasRecord,
    ) -> Result<()> {
        let batch = ChangeBatch::builder()
            .comment(CHANGE_COMMENT)
            .changes(record.change(action)?)
            .build()?;
        self.block_on(
            self.route53
                .change_resource_record_sets()
                .hosted_zone_id(hosted_zone_id)
                .change_batch(batch)
                .send(),
        )
        .map_err(|err| {
            service_error(
                "ChangeResourceRecordSets",
                err.into_service_error(),
                record_was_missing,
            )
        })?;
        Ok(())
    }
}
