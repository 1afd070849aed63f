use std::sync::Arc;
use std::time::Duration;

use clouddev_aws::AwsClients;
use clouddev_core::ListenerKind;
use clouddev_image::{DockerCli, GitCredentials, ImagePipeline};
use clouddev_operations::operations::ProviderSet;
use clouddev_operations::providers::{
    DockerImageBuilder, EcrRegistry, EcsServices, EcsTaskDefinitions, ElbListenerRules,
    ElbTargetGroups, HttpsHealthProbe, KibanaLogIndex, LogShipping, Route53Records,
    SecretsManagerStore,
};
use clouddev_operations::{DeploymentEnvironment, DeploymentSecrets};

/// Wires the concrete providers for one invocation.
pub(crate) fn build(
    env: &DeploymentEnvironment,
    secrets: &DeploymentSecrets,
) -> clouddev_operations::Result<ProviderSet> {
    let aws = AwsClients::connect(env.region.as_str(), env.aws_endpoint_url.as_deref())?;
    let git_credentials = match (&secrets.github_user, &secrets.github_password) {
        (Some(username), Some(password)) => Some(GitCredentials {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };
    let pipeline = ImagePipeline::new(DockerCli::new(), env.checkout_dir());

    Ok(ProviderSet {
        registry: Arc::new(EcrRegistry::new(aws.clone())),
        secrets: Arc::new(SecretsManagerStore::new(aws.clone())),
        task_definitions: Arc::new(EcsTaskDefinitions::new(
            aws.clone(),
            LogShipping::new(env, secrets),
        )),
        target_groups: Arc::new(ElbTargetGroups::new(aws.clone())),
        dns: Arc::new(Route53Records::new(aws.clone(), env.hosted_zone_id.as_str())),
        https_rules: Arc::new(ElbListenerRules::new(
            aws.clone(),
            ListenerKind::Https,
            env.https_listener_arn.as_str(),
        )),
        http_rules: Arc::new(ElbListenerRules::new(
            aws.clone(),
            ListenerKind::Http,
            env.http_listener_arn.as_str(),
        )),
        services: Arc::new(EcsServices::new(aws.clone(), env.cluster.as_str())),
        log_index: Arc::new(KibanaLogIndex::new(
            &env.kibana_host,
            secrets.kibana_user.as_str(),
            secrets.kibana_password.as_str(),
        )?),
        health: Arc::new(HttpsHealthProbe::new(Duration::from_secs(
            env.health_warmup_secs,
        ))?),
        images: Arc::new(
            DockerImageBuilder::new(pipeline, aws, env.github_organisation.as_str())
                .with_credentials(git_credentials),
        ),
    })
}
