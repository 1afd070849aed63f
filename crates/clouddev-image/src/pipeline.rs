use std::path::PathBuf;

use tracing::info;

use crate::docker::DockerCli;
use crate::source::SourceCheckout;
use crate::{ImageError, Result};

/// Tag pushed for every build.
const IMAGE_TAG: &str = "latest";

/// Registry login user for token-based registry passwords.
const REGISTRY_USER: &str = "AWS";

/// One build-and-push run.
#[derive(Debug)]
pub struct BuildRequest<'a> {
    pub source: &'a SourceCheckout,
    pub branch: &'a str,
    /// Local image name; also the checkout directory name.
    pub image_name: &'a str,
    /// `{registry host}/{repository}` without a tag.
    pub registry_uri: &'a str,
    pub registry_password: &'a str,
}

/// Clones the source, builds the image and pushes it to the registry.
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    docker: DockerCli,
    workspace: PathBuf,
}

impl ImagePipeline {
    /// `workspace` is the parent directory for source checkouts.
    pub fn new(docker: DockerCli, workspace: impl Into<PathBuf>) -> Self {
        Self {
            docker,
            workspace: workspace.into(),
        }
    }

    /// Run the full pipeline and return the pushed image reference.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; later stages are not attempted.
    pub fn build_and_push(&self, request: &BuildRequest<'_>) -> Result<String> {
        let registry_host = registry_host(request.registry_uri)?;
        let checkout = self.workspace.join(request.image_name);
        request.source.clone_into(&checkout, request.branch)?;

        info!(image = request.image_name, "building image");
        self.docker.build(&checkout, request.image_name)?;

        self.docker
            .login(registry_host, REGISTRY_USER, request.registry_password)?;

        let remote = format!("{}:{IMAGE_TAG}", request.registry_uri);
        self.docker.tag(request.image_name, &remote)?;

        info!(image = %remote, "pushing image");
        self.docker.push(&remote)?;
        Ok(remote)
    }
}

fn registry_host(registry_uri: &str) -> Result<&str> {
    match registry_uri.split_once('/') {
        Some((host, repository)) if !host.is_empty() && !repository.is_empty() => Ok(host),
        _ => Err(ImageError::InvalidRegistryUri {
            uri: registry_uri.to_string(),
        }),
    }
}
