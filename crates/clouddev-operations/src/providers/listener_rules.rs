use clouddev_aws::AwsClients;
use clouddev_aws::elbv2::{CreateRuleInput, RuleAction};
use clouddev_core::{ListenerKind, OwnerTag};
use tracing::debug;

use super::{deleted, owner_tags};
use crate::Result;
use crate::traits::ListenerRules;

/// Host-header rules on one listener of the shared load balancer.
pub struct ElbListenerRules {
    aws: AwsClients,
    kind: ListenerKind,
    listener_arn: String,
}

impl ElbListenerRules {
    #[must_use]
    pub fn new(aws: AwsClients, kind: ListenerKind, listener_arn: impl Into<String>) -> Self {
        Self {
            aws,
            kind,
            listener_arn: listener_arn.into(),
        }
    }

    fn add_rule(
        &self,
        host: &str,
        action: RuleAction,
        priority: u16,
        owner: &OwnerTag,
    ) -> Result<String> {
        let rule = self.aws.create_rule(&CreateRuleInput {
            listener_arn: self.listener_arn.clone(),
            host: host.to_string(),
            priority,
            action,
            tags: owner_tags(owner),
        })?;
        debug!(listener = %self.kind, host, priority, arn = %rule.rule_arn, "listener rule added");
        Ok(rule.rule_arn)
    }
}

impl ListenerRules for ElbListenerRules {
    fn listener(&self) -> ListenerKind {
        self.kind
    }

    fn host_rule_exists(&self, host: &str) -> Result<bool> {
        Ok(self.find_rule_arn_by_host(host)?.is_some())
    }

    fn add_forward_rule(
        &self,
        host: &str,
        target_group_arn: &str,
        priority: u16,
        owner: &OwnerTag,
    ) -> Result<String> {
        self.add_rule(
            host,
            RuleAction::Forward {
                target_group_arn: target_group_arn.to_string(),
            },
            priority,
            owner,
        )
    }

    fn add_redirect_rule(&self, host: &str, priority: u16, owner: &OwnerTag) -> Result<String> {
        self.add_rule(host, RuleAction::RedirectToHttps, priority, owner)
    }

    fn find_rule_arn_by_host(&self, host: &str) -> Result<Option<String>> {
        Ok(self
            .aws
            .describe_rules(&self.listener_arn)?
            .into_iter()
            .find(|rule| rule.matches_host(host))
            .map(|rule| rule.rule_arn))
    }

    fn delete_rule(&self, arn: &str) -> Result<bool> {
        deleted(self.aws.delete_rule(arn))
    }
}
