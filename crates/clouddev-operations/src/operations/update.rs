use tracing::info;

use super::{ProviderSet, resolve_names};
use crate::environment::{DeploymentEnvironment, DeploymentRequest};
use crate::specs::{ImageBuildRequest, TaskDefinitionSpec};
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutput {
    pub image: String,
    pub task_definition_arn: String,
}

/// Rebuilds the image and rolls the service onto a new task-definition revision.
///
/// Nothing is compensated: a failure leaves earlier revisions registered and
/// the service on the revision it was running.
pub struct UpdateOperation {
    providers: ProviderSet,
}

impl UpdateOperation {
    #[must_use]
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    /// # Errors
    ///
    /// Returns `InvalidIdentity`, `ServiceNotFound`, or the first failing
    /// provider call.
    pub fn execute(
        &self,
        environment: &DeploymentEnvironment,
        request: &DeploymentRequest,
    ) -> Result<UpdateOutput> {
        let (_, names) = resolve_names(environment, &request.email, &request.app_name)?;

        if !self.providers.services.service_exists(&names.service_name)? {
            return Err(OperationError::ServiceNotFound {
                name: names.service_name,
            });
        }

        let registry_uri = names.registry_uri(&environment.account_id, &environment.region);
        let image = self.providers.images.build_and_push(&ImageBuildRequest {
            source_repository: request.source_repository.clone(),
            branch: request.branch.clone(),
            image_name: names.repository_name.clone(),
            registry_uri: registry_uri.clone(),
        })?;
        info!(image = %image, "image pushed");

        let spec = TaskDefinitionSpec::derive(environment, &names, request, &registry_uri);
        let revision = self.providers.task_definitions.register(&spec)?;
        info!(arn = %revision.arn, "task definition revision registered");

        self.providers
            .services
            .force_redeploy(&names.service_name, &revision.arn)?;
        info!(service = %names.service_name, arn = %revision.arn, "deployment started");

        Ok(UpdateOutput {
            image,
            task_definition_arn: revision.arn,
        })
    }
}
