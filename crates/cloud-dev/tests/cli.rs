use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

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
health_warmup_secs = 0
"#;

fn config_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("cloud-dev.toml"), CONFIG).expect("write cloud-dev.toml");
    dir
}

fn cloud_dev(dir: &TempDir) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cloud-dev");
    cmd.current_dir(dir.path())
        .env_remove("AWS_ACCESS_KEY_ID")
        .env_remove("AWS_SECRET_ACCESS_KEY")
        .env_remove("AWS_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_operations() {
    let dir = config_dir();

    cloud_dev(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("create"))
        .stdout(contains("--source-secret"));
}

#[test]
fn unknown_operation_is_rejected_by_the_parser() {
    let dir = config_dir();

    cloud_dev(&dir)
        .args(["deploy", "jane@acme.com", "billing"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'deploy'"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().expect("create temp dir");

    cloud_dev(&dir)
        .args(["delete", "jane@acme.com", "billing"])
        .env("AWS_PROFILE", "dev")
        .assert()
        .failure()
        .stderr(contains("error: failed to read configuration 'cloud-dev.toml'"))
        .stderr(contains("caused by:"));
}

#[test]
fn config_flag_overrides_default_path() {
    let dir = config_dir();
    fs::rename(
        dir.path().join("cloud-dev.toml"),
        dir.path().join("staging.toml"),
    )
    .expect("rename config");

    cloud_dev(&dir)
        .args(["delete", "jane@gmail.com", "billing", "--config", "staging.toml"])
        .env("AWS_PROFILE", "dev")
        .assert()
        .failure()
        .stderr(contains("error: delete failed"));
}

#[test]
fn missing_aws_credentials_stop_before_any_work() {
    let dir = config_dir();

    cloud_dev(&dir)
        .args(["delete", "jane@acme.com", "billing"])
        .assert()
        .failure()
        .stderr(contains("AWS credentials not found"));
}

#[test]
fn foreign_email_fails_with_identity_cause() {
    let dir = config_dir();

    cloud_dev(&dir)
        .args(["delete", "jane@gmail.com", "billing"])
        .env("AWS_PROFILE", "dev")
        .assert()
        .failure()
        .stderr(contains("error: delete failed"))
        .stderr(contains("caused by: invalid identity"));
}

#[test]
fn create_without_source_secret_is_rejected() {
    let dir = config_dir();

    cloud_dev(&dir)
        .args(["create", "jane@acme.com", "billing"])
        .env("AWS_PROFILE", "dev")
        .assert()
        .failure()
        .stderr(contains("'create' requires --source-secret"));
}

#[test]
fn version_starts_with_package_version() {
    let dir = config_dir();

    cloud_dev(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(concat!("cloud-dev ", env!("CARGO_PKG_VERSION"))));
}
