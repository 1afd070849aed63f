//! Elastic Load Balancing v2: target groups and listener rules.

use aws_sdk_elasticloadbalancingv2::error::ProvideErrorMetadata;
use aws_sdk_elasticloadbalancingv2::operation::delete_rule::DeleteRuleError;
use aws_sdk_elasticloadbalancingv2::operation::delete_target_group::DeleteTargetGroupError;
use aws_sdk_elasticloadbalancingv2::operation::describe_target_groups::DescribeTargetGroupsError;
use aws_sdk_elasticloadbalancingv2::types::{
    Action, ActionTypeEnum, HostHeaderConditionConfig, Matcher, ProtocolEnum,
    RedirectActionConfig, RedirectActionStatusCodeEnum, RuleCondition,
    TargetGroupIpAddressTypeEnum, TargetTypeEnum,
};

use crate::error::{AwsError, Result, service_error};
use crate::{AwsClients, Tag};

const HOST_HEADER: &str = "host-header";

/// An HTTP/1 target group of IPv4 task addresses, health-checked on the traffic port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTargetGroupInput {
    pub name: String,
    pub port: u16,
    pub vpc_id: String,
    pub health_check_path: String,
    pub health_check_interval_seconds: u32,
    pub health_check_timeout_seconds: u32,
    pub healthy_threshold_count: u32,
    pub unhealthy_threshold_count: u32,
    /// Status codes counted as healthy, e.g. `200` or `200-399`.
    pub success_codes: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    pub target_group_arn: String,
    pub target_group_name: String,
}

impl From<&aws_sdk_elasticloadbalancingv2::types::TargetGroup> for TargetGroup {
    fn from(group: &aws_sdk_elasticloadbalancingv2::types::TargetGroup) -> Self {
        Self {
            target_group_arn: group.target_group_arn().unwrap_or_default().to_string(),
            target_group_name: group.target_group_name().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    Forward { target_group_arn: String },
    /// Permanent redirect to the same host, path and query over HTTPS.
    RedirectToHttps,
}

impl RuleAction {
    fn to_sdk(&self) -> Result<Action> {
        let action = match self {
            Self::Forward { target_group_arn } => Action::builder()
                .r#type(ActionTypeEnum::Forward)
                .target_group_arn(target_group_arn)
                .build(),
            Self::RedirectToHttps => Action::builder()
                .r#type(ActionTypeEnum::Redirect)
                .redirect_config(
                    RedirectActionConfig::builder()
                        .protocol("HTTPS")
                        .port("443")
                        .host("#{host}")
                        .path("/#{path}")
                        .query("#{query}")
                        .status_code(RedirectActionStatusCodeEnum::Http301)
                        .build(),
                )
                .build(),
        };
        Ok(action)
    }
}

/// A rule matching one host header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRuleInput {
    pub listener_arn: String,
    pub host: String,
    pub priority: u16,
    pub action: RuleAction,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub rule_arn: String,
    pub priority: String,
    /// Every host-header value the rule's conditions match.
    pub hosts: Vec<String>,
    pub is_default: bool,
}

impl Rule {
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|value| value.eq_ignore_ascii_case(host))
    }
}

impl From<&aws_sdk_elasticloadbalancingv2::types::Rule> for Rule {
    fn from(rule: &aws_sdk_elasticloadbalancingv2::types::Rule) -> Self {
        let hosts = rule
            .conditions()
            .iter()
            .filter(|condition| condition.field() == Some(HOST_HEADER))
            .flat_map(|condition| {
                let configured = condition
                    .host_header_config()
                    .map(HostHeaderConditionConfig::values)
                    .unwrap_or_default();
                configured.iter().chain(condition.values())
            })
            .cloned()
            .collect();
        Self {
            rule_arn: rule.rule_arn().unwrap_or_default().to_string(),
            priority: rule.priority().unwrap_or_default().to_string(),
            hosts,
            is_default: rule.is_default().unwrap_or(false),
        }
    }
}

fn elb_tags(tags: &[Tag]) -> Result<Vec<aws_sdk_elasticloadbalancingv2::types::Tag>> {
    tags.iter()
        .map(|tag| {
            Ok(aws_sdk_elasticloadbalancingv2::types::Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build())
        })
        .collect()
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn target_group_was_missing(err: &DeleteTargetGroupError) -> bool {
    err.code() == Some("TargetGroupNotFound")
}

impl AwsClients {
    pub fn create_target_group(&self, input: &CreateTargetGroupInput) -> Result<TargetGroup> {
        let output = self
            .block_on(
                self.elbv2
                    .create_target_group()
                    .name(&input.name)
                    .protocol(ProtocolEnum::Http)
                    .protocol_version("HTTP1")
                    .port(i32::from(input.port))
                    .vpc_id(&input.vpc_id)
                    .target_type(TargetTypeEnum::Ip)
                    .ip_address_type(TargetGroupIpAddressTypeEnum::Ipv4)
                    .health_check_enabled(true)
                    .health_check_protocol(ProtocolEnum::Http)
                    .health_check_port("traffic-port")
                    .health_check_path(&input.health_check_path)
                    .health_check_interval_seconds(to_i32(input.health_check_interval_seconds))
                    .health_check_timeout_seconds(to_i32(input.health_check_timeout_seconds))
                    .healthy_threshold_count(to_i32(input.healthy_threshold_count))
                    .unhealthy_threshold_count(to_i32(input.unhealthy_threshold_count))
                    .matcher(Matcher::builder().http_code(&input.success_codes).build())
                    .set_tags(Some(elb_tags(&input.tags)?))
                    .send(),
            )
            .map_err(|err| AwsError::service("CreateTargetGroup", err.into_service_error()))?;
        output
            .target_groups()
            .first()
            .map(TargetGroup::from)
            .ok_or(AwsError::MissingField {
                operation: "CreateTargetGroup",
                what: "target group",
            })
    }

    /// Look a target group up by name; `None` when it does not exist.
    pub fn describe_target_group(&self, name: &str) -> Result<Option<TargetGroup>> {
        let described = self.block_on(self.elbv2.describe_target_groups().names(name).send());
        match described {
            Ok(output) => Ok(output.target_groups().first().map(TargetGroup::from)),
            Err(err) => {
                let err = service_error(
                    "DescribeTargetGroups",
                    err.into_service_error(),
                    DescribeTargetGroupsError::is_target_group_not_found_exception,
                );
                if err.is_not_found() { Ok(None) } else { Err(err) }
            }
        }
    }

    pub fn delete_target_group(&self, arn: &str) -> Result<()> {
        self.block_on(self.elbv2.delete_target_group().target_group_arn(arn).send())
            .map_err(|err| {
                service_error(
                    "DeleteTargetGroup",
                    err.into_service_error(),
                    target_group_was_missing,
                )
            })?;
        Ok(())
    }

    pub fn describe_rules(&self, listener_arn: &str) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();
        let mut marker = None;
        loop {
            let page = self
                .block_on(
                    self.elbv2
                        .describe_rules()
                        .listener_arn(listener_arn)
                        .set_marker(marker.take())
                        .send(),
                )
                .map_err(|err| AwsError::service("DescribeRules", err.into_service_error()))?;
            rules.extend(page.rules().iter().map(Rule::from));
            match page.next_marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }
        Ok(rules)
    }

    pub fn create_rule(&self, input: &CreateRuleInput) -> Result<Rule> {
        let condition = RuleCondition::builder()
            .field(HOST_HEADER)
            .host_header_config(
                HostHeaderConditionConfig::builder()
                    .values(&input.host)
                    .build(),
            )
            .build();
        let output = self
            .block_on(
                self.elbv2
                    .create_rule()
                    .listener_arn(&input.listener_arn)
                    .conditions(condition)
                    .priority(i32::from(input.priority))
                    .actions(input.action.to_sdk()?)
                    .set_tags(Some(elb_tags(&input.tags)?))
                    .send(),
            )
            .map_err(|err| AwsError::service("CreateRule", err.into_service_error()))?;
        output
            .rules()
            .first()
            .map(Rule::from)
            .ok_or(AwsError::MissingField {
                operation: "CreateRule",
                what: "rule",
            })
    }

    pub fn delete_rule(&self, rule_arn: &str) -> Result<()> {
        self.block_on(self.elbv2.delete_rule().rule_arn(rule_arn).send())
            .map_err(|err| {
                service_error(
                    "DeleteRule",
                    err.into_service_error(),
                    DeleteRuleError::is_rule_not_found_exception,
                )
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_elasticloadbalancingv2::error::ErrorMetadata;

    use super::*;

    fn sdk_rule(field: &str, configured: &[&str], legacy: &[&str]) -> Rule {
        let mut condition = RuleCondition::builder().field(field);
        if !configured.is_empty() {
            let mut config = HostHeaderConditionConfig::builder();
            for value in configured {
                config = config.values(*value);
            }
            condition = condition.host_header_config(config.build());
        }
        for value in legacy {
            condition = condition.values(*value);
        }
        let rule = aws_sdk_elasticloadbalancingv2::types::Rule::builder()
            .rule_arn("arn:aws:elasticloadbalancing:eu-west-1:1:listener-rule/app/lb/1/2/3")
            .priority("17")
            .conditions(condition.build())
            .is_default(false)
            .build();
        Rule::from(&rule)
    }

    #[test]
    fn rule_matches_host_header_config_case_insensitively() {
        let rule = sdk_rule(HOST_HEADER, &["jane-billing.dev.acme.io"], &[]);

        assert!(rule.matches_host("JANE-billing.dev.acme.io"));
        assert!(!rule.matches_host("john-billing.dev.acme.io"));
        assert_eq!(rule.priority, "17");
    }

    #[test]
    fn legacy_values_field_also_matches() {
        let rule = sdk_rule(HOST_HEADER, &[], &["jane-billing.dev.acme.io"]);

        assert!(rule.matches_host("jane-billing.dev.acme.io"));
    }

    #[test]
    fn other_condition_fields_are_ignored() {
        let rule = sdk_rule("path-pattern", &[], &["jane-billing.dev.acme.io"]);

        assert!(rule.hosts.is_empty());
        assert!(!rule.matches_host("jane-billing.dev.acme.io"));
    }

    #[test]
    fn redirect_keeps_host_path_and_query() -> anyhow::Result<()> {
        let action = RuleAction::RedirectToHttps.to_sdk()?;

        assert_eq!(action.r#type(), Some(&ActionTypeEnum::Redirect));
        let redirect = action
            .redirect_config()
            .ok_or_else(|| anyhow::anyhow!("redirect config missing"))?;
        assert_eq!(redirect.path(), Some("/#{path}"));
        assert_eq!(redirect.status_code(), Some(&RedirectActionStatusCodeEnum::Http301));
        assert!(action.target_group_arn().is_none());
        Ok(())
    }

    #[test]
    fn missing_target_group_is_recognised_by_code() {
        let missing = DeleteTargetGroupError::generic(
            ErrorMetadata::builder().code("TargetGroupNotFound").build(),
        );
        let in_use = DeleteTargetGroupError::generic(
            ErrorMetadata::builder().code("ResourceInUse").build(),
        );

        assert!(target_group_was_missing(&missing));
        assert!(!target_group_was_missing(&in_use));
    }
}
