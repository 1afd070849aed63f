use crate::identity::UserIdentity;

/// Longest name the load balancer accepts for a target group.
pub const TARGET_GROUP_NAME_MAX_LEN: usize = 31;

const NAME_PREFIX: &str = "cloud-dev";

#[must_use]
pub fn derive_service_name(user_token: &str, app_name: &str) -> String {
    format!("{NAME_PREFIX}-{user_token}-{app_name}")
}

#[must_use]
pub fn derive_domain_label(user_token: &str, app_name: &str) -> String {
    format!("{user_token}-{app_name}")
}

/// Truncates `{token}-{app}` to [`TARGET_GROUP_NAME_MAX_LEN`] characters, then
/// drops everything outside `[A-Za-z0-9.]`.
///
/// Truncation runs first, so stripping can only shorten the result.
#[must_use]
pub fn derive_target_group_name(user_token: &str, app_name: &str) -> String {
    format!("{user_token}-{app_name}")
        .chars()
        .take(TARGET_GROUP_NAME_MAX_LEN)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect()
}

/// Every name a deployment uses, recomputed from the owner and app name.
///
/// Nothing here is persisted; `update` and `delete` rebuild the same value
/// from the same inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentNames {
    pub app_name: String,
    /// Compute service, task-definition family and secret name.
    pub service_name: String,
    pub secret_name: String,
    pub task_family: String,
    /// Registry repository; also the local image name.
    pub repository_name: String,
    pub domain_label: String,
    pub full_domain_name: String,
    pub target_group_name: String,
    pub log_index_pattern: String,
}

impl DeploymentNames {
    #[must_use]
    pub fn derive(identity: &UserIdentity, app_name: &str, hosted_zone_domain: &str) -> Self {
        let token = identity.token();
        let service_name = derive_service_name(token, app_name);
        let domain_label = derive_domain_label(token, app_name);
        let zone = hosted_zone_domain.trim_end_matches('.');

        Self {
            app_name: app_name.to_string(),
            secret_name: service_name.clone(),
            task_family: service_name.clone(),
            service_name,
            repository_name: app_name.to_string(),
            full_domain_name: format!("{domain_label}.{zone}"),
            domain_label,
            target_group_name: derive_target_group_name(token, app_name),
            log_index_pattern: format!("{app_name}*"),
        }
    }

    /// Registry URI of the app's repository.
    #[must_use]
    pub fn registry_uri(&self, account_id: &str, region: &str) -> String {
        format!(
            "{account_id}.dkr.ecr.{region}.amazonaws.com/{}",
            self.repository_name
        )
    }
}
