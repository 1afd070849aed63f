use std::fmt;
use std::future::Future;
use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::config::Credentials;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::{AwsError, Result};

/// One client per service, all bound to the same region and credentials.
///
/// Cloning is cheap; clones share the runtime and the underlying connections.
#[derive(Clone)]
pub struct AwsClients {
    runtime: Arc<Runtime>,
    region: String,
    pub(crate) ecr: aws_sdk_ecr::Client,
    pub(crate) ecs: aws_sdk_ecs::Client,
    pub(crate) elbv2: aws_sdk_elasticloadbalancingv2::Client,
    pub(crate) route53: aws_sdk_route53::Client,
    pub(crate) secrets: aws_sdk_secretsmanager::Client,
}

impl AwsClients {
    /// Resolves credentials through the standard chain (environment, profile,
    /// instance role). `endpoint_url` overrides every service endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AwsError::Runtime`] if the runtime cannot be started.
    pub fn connect(region: impl Into<String>, endpoint_url: Option<&str>) -> Result<Self> {
        Self::load(region.into(), endpoint_url, None)
    }

    /// Like [`connect`](Self::connect) with fixed access keys.
    ///
    /// # Errors
    ///
    /// Returns [`AwsError::Runtime`] if the runtime cannot be started.
    pub fn connect_with_keys(
        region: impl Into<String>,
        endpoint_url: Option<&str>,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Result<Self> {
        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "cloud-dev");
        Self::load(region.into(), endpoint_url, Some(credentials))
    }

    fn load(
        region: String,
        endpoint_url: Option<&str>,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AwsError::Runtime)?;

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.clone()));
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        if let Some(credentials) = credentials {
            loader = loader.credentials_provider(credentials);
        }
        let config = runtime.block_on(loader.load());
        debug!(region = %region, endpoint = ?endpoint_url, "AWS clients configured");

        Ok(Self {
            runtime: Arc::new(runtime),
            region,
            ecr: aws_sdk_ecr::Client::new(&config),
            ecs: aws_sdk_ecs::Client::new(&config),
            elbv2: aws_sdk_elasticloadbalancingv2::Client::new(&config),
            route53: aws_sdk_route53::Client::new(&config),
            secrets: aws_sdk_secretsmanager::Client::new(&config),
        })
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl fmt::Debug for AwsClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsClients")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
