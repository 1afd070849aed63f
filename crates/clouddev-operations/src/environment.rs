use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_HEALTH_WARMUP_SECS: u64 = 120;
const DEFAULT_LOG_ROUTER_IMAGE: &str = "public.ecr.aws/aws-observability/aws-for-fluent-bit:stable";

/// Static parameters of the shared account the environments are created in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct DeploymentEnvironment {
    pub region: String,
    pub account_id: String,
    pub cluster: String,
    pub vpc_id: String,
    pub subnet_id: String,
    pub security_group_id: String,
    pub task_role_name: String,
    pub execution_role_name: String,
    pub hosted_zone_id: String,
    pub hosted_zone_domain: String,
    pub load_balancer_dns_name: String,
    /// Canonical hosted zone of the load balancer, fixed per region.
    pub load_balancer_zone_id: String,
    pub https_listener_arn: String,
    pub http_listener_arn: String,
    pub elasticsearch_host: String,
    pub elasticsearch_user: String,
    pub kibana_host: String,
    pub company_domain: String,
    pub github_organisation: String,
    #[serde(default = "default_log_router_image")]
    pub log_router_image: String,
    #[serde(default = "default_health_warmup_secs")]
    pub health_warmup_secs: u64,
    /// Parent directory for source checkouts; the system temp dir when unset.
    #[serde(default)]
    pub checkout_dir: Option<PathBuf>,
    /// Overrides the AWS endpoint, e.g. for a local stand-in.
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,
}

fn default_log_router_image() -> String {
    DEFAULT_LOG_ROUTER_IMAGE.to_string()
}

fn default_health_warmup_secs() -> u64 {
    DEFAULT_HEALTH_WARMUP_SECS
}

impl DeploymentEnvironment {
    #[must_use]
    pub fn role_arn(&self, role_name: &str) -> String {
        format!("arn:aws:iam::{}:role/{role_name}", self.account_id)
    }

    #[must_use]
    pub fn checkout_dir(&self) -> PathBuf {
        self.checkout_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("cloud-dev"))
    }
}

/// Per-run parameters of one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub email: String,
    pub app_name: String,
    pub container_port: u16,
    /// Path below `/` probed by the load balancer and the post-deploy check.
    pub health_check_path: String,
    pub source_repository: String,
    pub branch: String,
    /// Existing secret whose value seeds the deployment's own secret.
    pub source_secret: String,
}

/// Credentials that never live in the configuration file.
#[derive(Clone, Default)]
pub struct DeploymentSecrets {
    pub elasticsearch_password: String,
    pub kibana_user: String,
    pub kibana_password: String,
    pub github_user: Option<String>,
    pub github_password: Option<String>,
}

impl std::fmt::Debug for DeploymentSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentSecrets")
            .field("kibana_user", &self.kibana_user)
            .field("github_user", &self.github_user)
            .finish_non_exhaustive()
    }
}
