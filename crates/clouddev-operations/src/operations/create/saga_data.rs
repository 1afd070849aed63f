use clouddev_core::{DeploymentNames, ListenerPriorities, OwnerTag, ResourceKind, UserIdentity};

use crate::Result;
use crate::environment::{DeploymentEnvironment, DeploymentRequest};
use crate::operations::resolve_names;

/// Handles produced by completed create steps.
///
/// A handle is `Some` exactly while its step has completed and has not been
/// rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceHandles {
    pub repository_uri: Option<String>,
    pub pushed_image: Option<String>,
    pub secret_name: Option<String>,
    pub task_definition_arn: Option<String>,
    pub target_group_arn: Option<String>,
    pub dns_record_name: Option<String>,
    pub https_rule_arn: Option<String>,
    pub http_rule_arn: Option<String>,
    pub service_arn: Option<String>,
    pub log_index_created: bool,
}

impl ResourceHandles {
    /// Kinds whose handle is currently held, in creation order.
    #[must_use]
    pub fn held(&self) -> Vec<ResourceKind> {
        [
            (ResourceKind::Repository, self.repository_uri.is_some()),
            (ResourceKind::Secret, self.secret_name.is_some()),
            (ResourceKind::TaskDefinition, self.task_definition_arn.is_some()),
            (ResourceKind::TargetGroup, self.target_group_arn.is_some()),
            (ResourceKind::DnsRecord, self.dns_record_name.is_some()),
            (ResourceKind::HttpsRule, self.https_rule_arn.is_some()),
            (ResourceKind::HttpRule, self.http_rule_arn.is_some()),
            (ResourceKind::ComputeService, self.service_arn.is_some()),
            (ResourceKind::LogIndex, self.log_index_created),
        ]
        .into_iter()
        .filter_map(|(kind, held)| held.then_some(kind))
        .collect()
    }
}

/// Accumulated state of one `create` run.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub environment: DeploymentEnvironment,
    pub request: DeploymentRequest,
    pub identity: UserIdentity,
    pub names: DeploymentNames,
    pub priorities: ListenerPriorities,
    pub handles: ResourceHandles,
}

impl WorkflowContext {
    /// Validates the owner, derives all names and draws listener priorities.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` if the request's e-mail is not a company address.
    pub fn new(environment: DeploymentEnvironment, request: DeploymentRequest) -> Result<Self> {
        let (identity, names) = resolve_names(&environment, &request.email, &request.app_name)?;
        Ok(Self {
            environment,
            request,
            identity,
            names,
            priorities: ListenerPriorities::random(),
            handles: ResourceHandles::default(),
        })
    }

    #[must_use]
    pub fn with_priorities(mut self, priorities: ListenerPriorities) -> Self {
        self.priorities = priorities;
        self
    }

    #[must_use]
    pub fn owner(&self) -> OwnerTag {
        OwnerTag::new(self.identity.email())
    }

    /// Whether every step that produces a handle has completed.
    #[must_use]
    pub fn is_fully_provisioned(&self) -> bool {
        let h = &self.handles;
        h.repository_uri.is_some()
            && h.secret_name.is_some()
            && h.task_definition_arn.is_some()
            && h.target_group_arn.is_some()
            && h.dns_record_name.is_some()
            && h.https_rule_arn.is_some()
            && h.http_rule_arn.is_some()
            && h.service_arn.is_some()
    }
}
