use std::fs;
use std::path::Path;

use clouddev_operations::DeploymentEnvironment;
use tracing::debug;

use crate::error::{CliError, Result};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "cloud-dev.toml";

pub(crate) fn load_environment(path: &Path) -> Result<DeploymentEnvironment> {
    let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let environment: DeploymentEnvironment =
        toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), region = %environment.region, cluster = %environment.cluster, "configuration loaded");
    Ok(environment)
}

/// Fails unless a key pair or a named profile is available to the AWS SDK.
pub(crate) fn check_aws_credentials(lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    let present = |name: &str| lookup(name).is_some_and(|value| !value.trim().is_empty());

    if present("AWS_ACCESS_KEY_ID") && present("AWS_SECRET_ACCESS_KEY") {
        debug!("using AWS access key from the environment");
        return Ok(());
    }
    if present("AWS_PROFILE") {
        debug!("using AWS profile from the environment");
        return Ok(());
    }
    Err(CliError::MissingAwsCredentials)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;

    const CONFIG: &str = r#"
region = "eu-west-1"
account_id = "123456789012"
cluster = "cloud-dev"
vpc_id = "vpc-1"
subnet_id = "subnet-1"
security_group_id = "sg-1"
task_role_name = "cloud-dev-task"
execution_role_name = "cloud-dev-exec"
hosted_zone_id = "Z1"
hosted_zone_domain = "dev.acme.io"
load_balancer_dns_name = "lb.eu-west-1.elb.amazonaws.com"
load_balancer_zone_id = "Z32O12XQLNTSW2"
https_listener_arn = "arn:https"
http_listener_arn = "arn:http"
elasticsearch_host = "es.acme.io"
elasticsearch_user = "logs"
kibana_host = "kibana.acme.io"
company_domain = "acme.com"
github_organisation = "acme"
health_warmup_secs = 30
"#;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn loads_environment_from_toml() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, CONFIG)?;

        let environment = load_environment(&path)?;

        assert_eq!(environment.cluster, "cloud-dev");
        assert_eq!(environment.health_warmup_secs, 30);
        Ok(())
    }

    #[test]
    fn missing_file_is_a_read_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let err = load_environment(&dir.path().join("absent.toml")).expect_err("no file");

        assert!(matches!(err, CliError::ConfigRead { .. }));
        Ok(())
    }

    #[test]
    fn incomplete_file_is_a_parse_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "region = \"eu-west-1\"\n")?;

        let err = load_environment(&path).expect_err("fields missing");

        assert!(matches!(err, CliError::ConfigParse { .. }));
        Ok(())
    }

    #[test]
    fn key_pair_is_accepted() {
        let lookup = env_of(&[("AWS_ACCESS_KEY_ID", "AKIA"), ("AWS_SECRET_ACCESS_KEY", "s3cr3t")]);

        assert!(check_aws_credentials(lookup).is_ok());
    }

    #[test]
    fn profile_is_accepted() {
        assert!(check_aws_credentials(env_of(&[("AWS_PROFILE", "dev")])).is_ok());
    }

    #[test]
    fn half_a_key_pair_is_rejected() {
        let lookup = env_of(&[("AWS_ACCESS_KEY_ID", "AKIA")]);

        assert!(matches!(
            check_aws_credentials(lookup),
            Err(CliError::MissingAwsCredentials)
        ));
    }

    #[test]
    fn blank_values_do_not_count() {
        let lookup = env_of(&[
            ("AWS_ACCESS_KEY_ID", " "),
            ("AWS_SECRET_ACCESS_KEY", ""),
            ("AWS_PROFILE", ""),
        ]);

        assert!(check_aws_credentials(lookup).is_err());
    }
}
