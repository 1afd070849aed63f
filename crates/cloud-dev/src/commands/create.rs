use clouddev_operations::operations::{CreateOperation, ProviderSet};
use clouddev_operations::{DeploymentEnvironment, DeploymentRequest, Result};

pub(super) fn run(
    environment: &DeploymentEnvironment,
    request: &DeploymentRequest,
    providers: ProviderSet,
) -> Result<()> {
    let operation = CreateOperation::new(providers);
    let context = operation.prepare(environment, request)?;

    let (result, audit) = operation.run(context);
    println!("{}", audit.summary());
    let context = result?;

    println!("\nEnvironment ready: https://{}", context.names.full_domain_name);
    println!("  service: {}", context.names.service_name);
    if let Some(image) = &context.handles.pushed_image {
        println!("  image:   {image}");
    }
    if !context.handles.log_index_created {
        println!(
            "  log index '{}' was not created; add it in Kibana",
            context.names.log_index_pattern
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clouddev_core::ResourceKind;
    use clouddev_operations::OperationError;
    use clouddev_operations::mocks::{MockCloud, sample_environment, sample_request};

    use super::*;

    #[test]
    fn provisions_through_the_given_providers() -> anyhow::Result<()> {
        let cloud = Arc::new(MockCloud::new());

        run(&sample_environment(), &sample_request(), cloud.provider_set())?;

        assert!(cloud.has(ResourceKind::ComputeService, "cloud-dev-jane-billing"));
        Ok(())
    }

    #[test]
    fn conflict_is_returned_before_the_saga_starts() {
        let cloud = Arc::new(
            MockCloud::new().with_existing(ResourceKind::Repository, "billing"),
        );

        let err = run(&sample_environment(), &sample_request(), cloud.provider_set())
            .expect_err("repository exists");

        assert!(matches!(err, OperationError::PreflightConflict { .. }));
        assert!(!cloud.call_names().iter().any(|c| c.starts_with("create")));
    }
}
