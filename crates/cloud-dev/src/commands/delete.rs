use clouddev_operations::operations::{DeleteOperation, ProviderSet};
use clouddev_operations::{DeploymentEnvironment, Result};

pub(super) fn run(
    environment: &DeploymentEnvironment,
    email: &str,
    app_name: &str,
    providers: ProviderSet,
) -> Result<()> {
    let report = DeleteOperation::new(providers).execute(environment, email, app_name)?;
    println!("{}", report.summary());

    report.into_result()?;
    println!("\nEnvironment removed.");
    Ok(())
}
