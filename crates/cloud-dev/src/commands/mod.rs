mod create;
mod delete;
mod update;

use clap::Args;
use clouddev_core::Operation;
use clouddev_operations::operations::ProviderSet;
use clouddev_operations::{DeploymentEnvironment, DeploymentRequest, DeploymentSecrets};

use crate::error::{CliError, Result};

#[derive(Args, Debug)]
pub(crate) struct DeploymentArgs {
    /// Port the app listens on inside its container
    #[arg(long, default_value_t = 8080)]
    container_port: u16,

    /// Path probed by the load balancer and the post-deploy check
    #[arg(long, default_value = "/")]
    health_check_path: String,

    /// Repository in the GitHub organisation (default: the app name)
    #[arg(long)]
    repo: Option<String>,

    /// Branch to build
    #[arg(long, default_value = "main")]
    branch: String,

    /// Existing secret whose value seeds the environment's own secret (create only)
    #[arg(long)]
    source_secret: Option<String>,
}

#[derive(Args)]
pub(crate) struct SecretArgs {
    #[arg(long, env = "ELASTICSEARCH_PASSWORD", hide_env_values = true)]
    elasticsearch_password: Option<String>,

    #[arg(long, env = "KIBANA_USERNAME", hide_env_values = true)]
    kibana_user: Option<String>,

    #[arg(long, env = "KIBANA_PASSWORD", hide_env_values = true)]
    kibana_password: Option<String>,

    #[arg(long, env = "GITHUB_CREDS_USR", hide_env_values = true)]
    github_user: Option<String>,

    #[arg(long, env = "GITHUB_CREDS_PSW", hide_env_values = true)]
    github_password: Option<String>,
}

impl SecretArgs {
    pub(crate) fn into_secrets(self) -> DeploymentSecrets {
        DeploymentSecrets {
            elasticsearch_password: self.elasticsearch_password.unwrap_or_default(),
            kibana_user: self.kibana_user.unwrap_or_default(),
            kibana_password: self.kibana_password.unwrap_or_default(),
            github_user: self.github_user,
            github_password: self.github_password,
        }
    }
}

/// One validated command line, ready to run.
#[derive(Debug)]
pub(crate) struct Invocation {
    operation: Operation,
    request: DeploymentRequest,
}

impl Invocation {
    pub(crate) fn new(
        operation: Operation,
        email: String,
        app_name: String,
        args: DeploymentArgs,
    ) -> Result<Self> {
        let source_secret = match (operation, args.source_secret) {
            (_, Some(secret)) => secret,
            (Operation::Create, None) => {
                return Err(CliError::MissingArgument {
                    operation,
                    flag: "--source-secret",
                });
            }
            (_, None) => String::new(),
        };

        Ok(Self {
            operation,
            request: DeploymentRequest {
                source_repository: args.repo.unwrap_or_else(|| app_name.clone()),
                email,
                app_name,
                container_port: args.container_port,
                health_check_path: args.health_check_path,
                branch: args.branch,
                source_secret,
            },
        })
    }

    pub(crate) fn execute(
        self,
        environment: &DeploymentEnvironment,
        providers: ProviderSet,
    ) -> Result<()> {
        let operation = self.operation;
        let result = match operation {
            Operation::Create => create::run(environment, &self.request, providers),
            Operation::Update => update::run(environment, &self.request, providers),
            Operation::Delete => delete::run(
                environment,
                &self.request.email,
                &self.request.app_name,
                providers,
            ),
        };
        result.map_err(|source| CliError::Operation { operation, source })
    }
}
