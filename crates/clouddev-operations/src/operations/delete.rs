use std::fmt;

use clouddev_core::ResourceKind;
use tracing::{error, info, warn};

use super::{ProviderSet, resolve_names};
use crate::environment::DeploymentEnvironment;
use crate::error::TeardownFailure;
use crate::specs::AliasTarget;
use crate::traits::ListenerRules;
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    Deleted,
    /// Nothing to delete; already gone or never created.
    Absent,
    Failed(String),
}

impl fmt::Display for TeardownOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => write!(f, "deleted"),
            Self::Absent => write!(f, "absent"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownEntry {
    pub resource: ResourceKind,
    pub name: String,
    pub outcome: TeardownOutcome,
}

/// What the delete workflow did, one entry per resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    entries: Vec<TeardownEntry>,
}

impl TeardownReport {
    #[must_use]
    pub fn entries(&self) -> &[TeardownEntry] {
        &self.entries
    }

    #[must_use]
    pub fn outcome(&self, resource: ResourceKind) -> Option<&TeardownOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.resource == resource)
            .map(|entry| &entry.outcome)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self
            .entries
            .iter()
            .any(|entry| matches!(entry.outcome, TeardownOutcome::Failed(_)))
    }

    #[must_use]
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{} '{}': {}", entry.resource, entry.name, entry.outcome))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// # Errors
    ///
    /// Returns `TeardownIncomplete` listing every resource that failed.
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        let failures = self
            .entries
            .into_iter()
            .filter_map(|entry| match entry.outcome {
                TeardownOutcome::Failed(reason) => Some(TeardownFailure {
                    resource: entry.resource,
                    name: entry.name,
                    reason,
                }),
                _ => None,
            })
            .collect();
        Err(OperationError::TeardownIncomplete { failures })
    }

    fn record(&mut self, resource: ResourceKind, name: &str, result: Result<bool>) {
        let outcome = match result {
            Ok(true) => {
                info!(resource = %resource, name, "deleted");
                TeardownOutcome::Deleted
            }
            Ok(false) => {
                warn!(resource = %resource, name, "already absent");
                TeardownOutcome::Absent
            }
            Err(err) => {
                error!(resource = %resource, name, error = %err, "delete failed, continuing");
                TeardownOutcome::Failed(err.to_string())
            }
        };
        self.entries.push(TeardownEntry {
            resource,
            name: name.to_string(),
            outcome,
        });
    }
}

/// Removes every resource of a deployment, found again by its derived names.
///
/// Each deletion is attempted regardless of earlier failures.
pub struct DeleteOperation {
    providers: ProviderSet,
}

impl DeleteOperation {
    #[must_use]
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    /// # Errors
    ///
    /// Returns `InvalidIdentity` only; provider failures are recorded in the report.
    pub fn execute(
        &self,
        environment: &DeploymentEnvironment,
        email: &str,
        app_name: &str,
    ) -> Result<TeardownReport> {
        let (_, names) = resolve_names(environment, email, app_name)?;
        let p = &self.providers;
        let mut report = TeardownReport::default();

        report.record(
            ResourceKind::ComputeService,
            &names.service_name,
            p.services.delete(&names.service_name),
        );
        report.record(
            ResourceKind::DnsRecord,
            &names.full_domain_name,
            p.dns
                .delete_alias(&names.full_domain_name, &AliasTarget::load_balancer(environment)),
        );
        report.record(
            ResourceKind::Repository,
            &names.repository_name,
            p.registry.delete_repository(&names.repository_name),
        );
        report.record(
            ResourceKind::TaskDefinition,
            &names.task_family,
            self.deregister_family(&names.task_family),
        );
        report.record(
            ResourceKind::Secret,
            &names.secret_name,
            p.secrets.delete_secret(&names.secret_name),
        );
        report.record(
            ResourceKind::HttpRule,
            &names.full_domain_name,
            delete_host_rule(p.http_rules.as_ref(), &names.full_domain_name),
        );
        report.record(
            ResourceKind::HttpsRule,
            &names.full_domain_name,
            delete_host_rule(p.https_rules.as_ref(), &names.full_domain_name),
        );
        report.record(
            ResourceKind::TargetGroup,
            &names.target_group_name,
            self.delete_target_group(&names.target_group_name),
        );

        Ok(report)
    }

    fn deregister_family(&self, family: &str) -> Result<bool> {
        let revisions = self.providers.task_definitions.list_revisions(family)?;
        if revisions.is_empty() {
            return Ok(false);
        }
        info!(family, count = revisions.len(), "deregistering revisions");
        self.providers.task_definitions.deregister(&revisions)?;
        Ok(true)
    }

    fn delete_target_group(&self, name: &str) -> Result<bool> {
        match self.providers.target_groups.lookup(name)? {
            Some(arn) => self.providers.target_groups.delete(&arn),
            None => Ok(false),
        }
    }
}

fn delete_host_rule(rules: &dyn ListenerRules, host: &str) -> Result<bool> {
    match rules.find_rule_arn_by_host(host)? {
        Some(arn) => rules.delete_rule(&arn),
        None => Ok(false),
    }
}
