use clouddev_operations::operations::{ProviderSet, UpdateOperation};
use clouddev_operations::{DeploymentEnvironment, DeploymentRequest, Result};

pub(super) fn run(
    environment: &DeploymentEnvironment,
    request: &DeploymentRequest,
    providers: ProviderSet,
) -> Result<()> {
    let output = UpdateOperation::new(providers).execute(environment, request)?;

    println!("Redeploying on {}", output.task_definition_arn);
    println!("  image: {}", output.image);
    Ok(())
}
