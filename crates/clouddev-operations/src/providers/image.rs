use clouddev_aws::AwsClients;
use clouddev_image::{BuildRequest, GitCredentials, ImagePipeline, SourceCheckout};

use crate::Result;
use crate::specs::ImageBuildRequest;
use crate::traits::ImageBuilder;

/// Builds images with `docker` from repositories of one GitHub organisation.
pub struct DockerImageBuilder {
    pipeline: ImagePipeline,
    aws: AwsClients,
    organisation: String,
    credentials: Option<GitCredentials>,
}

impl DockerImageBuilder {
    #[must_use]
    pub fn new(pipeline: ImagePipeline, aws: AwsClients, organisation: impl Into<String>) -> Self {
        Self {
            pipeline,
            aws,
            organisation: organisation.into(),
            credentials: None,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<GitCredentials>) -> Self {
        self.credentials = credentials;
        self
    }
}

impl ImageBuilder for DockerImageBuilder {
    fn build_and_push(&self, request: &ImageBuildRequest) -> Result<String> {
        let source = SourceCheckout::github(&self.organisation, &request.source_repository)
            .with_credentials(self.credentials.clone());
        let password = self.aws.ecr_login_password()?;

        Ok(self.pipeline.build_and_push(&BuildRequest {
            source: &source,
            branch: &request.branch,
            image_name: &request.image_name,
            registry_uri: &request.registry_uri,
            registry_password: &password,
        })?)
    }
}
