//! Delete and update driven purely by recomputed names.

use std::sync::Arc;

use clouddev_core::ResourceKind;
use clouddev_operations::OperationError;
use clouddev_operations::mocks::{MockCloud, sample_environment, sample_request};
use clouddev_operations::operations::{
    CreateOperation, DeleteOperation, TeardownOutcome, UpdateOperation,
};

fn provisioned() -> anyhow::Result<Arc<MockCloud>> {
    let cloud = Arc::new(MockCloud::new());
    CreateOperation::new(cloud.provider_set()).execute(&sample_environment(), &sample_request())?;
    cloud.clear_calls();
    Ok(cloud)
}

#[test]
fn delete_removes_everything_create_made() -> anyhow::Result<()> {
    let cloud = provisioned()?;
    let operation = DeleteOperation::new(cloud.provider_set());

    let report = operation
        .execute(&sample_environment(), "jane@acme.com", "billing")?
        .into_result()?;

    assert!(
        report
            .entries()
            .iter()
            .all(|entry| entry.outcome == TeardownOutcome::Deleted),
        "{}",
        report.summary()
    );
    assert_eq!(
        cloud.resources(),
        vec![(ResourceKind::LogIndex, "billing*".to_string())]
    );
    Ok(())
}

#[test]
fn delete_continues_past_a_failing_resource() -> anyhow::Result<()> {
    let cloud = provisioned()?;
    cloud.fail_on("delete_secret");
    let operation = DeleteOperation::new(cloud.provider_set());

    let report = operation.execute(&sample_environment(), "jane@acme.com", "billing")?;

    assert!(matches!(
        report.outcome(ResourceKind::Secret),
        Some(TeardownOutcome::Failed(_))
    ));
    for kind in [
        ResourceKind::HttpRule,
        ResourceKind::HttpsRule,
        ResourceKind::TargetGroup,
    ] {
        assert_eq!(report.outcome(kind), Some(&TeardownOutcome::Deleted));
    }
    match report.into_result() {
        Err(OperationError::TeardownIncomplete { failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].name, "cloud-dev-jane-billing");
        }
        other => panic!("expected TeardownIncomplete, got {other:?}"),
    }
    Ok(())
}

#[test]
fn already_deleted_secret_is_absent_not_failed() -> anyhow::Result<()> {
    let cloud = provisioned()?;
    cloud
        .provider_set()
        .secrets
        .delete_secret("cloud-dev-jane-billing")?;
    let operation = DeleteOperation::new(cloud.provider_set());

    let report = operation.execute(&sample_environment(), "jane@acme.com", "billing")?;

    assert_eq!(
        report.outcome(ResourceKind::Secret),
        Some(&TeardownOutcome::Absent)
    );
    assert!(report.is_complete());
    Ok(())
}

#[test]
fn delete_deregisters_every_revision_of_the_family() -> anyhow::Result<()> {
    let cloud = provisioned()?;
    UpdateOperation::new(cloud.provider_set()).execute(&sample_environment(), &sample_request())?;
    UpdateOperation::new(cloud.provider_set()).execute(&sample_environment(), &sample_request())?;
    let revisions = cloud
        .resources()
        .into_iter()
        .filter(|(kind, _)| *kind == ResourceKind::TaskDefinition)
        .count();
    assert_eq!(revisions, 3);

    DeleteOperation::new(cloud.provider_set()).execute(
        &sample_environment(),
        "jane@acme.com",
        "billing",
    )?;

    assert!(
        !cloud
            .resources()
            .iter()
            .any(|(kind, _)| *kind == ResourceKind::TaskDefinition)
    );
    Ok(())
}

#[test]
fn delete_targets_the_names_create_used() -> anyhow::Result<()> {
    let cloud = provisioned()?;
    let operation = DeleteOperation::new(cloud.provider_set());

    let report = operation.execute(&sample_environment(), "jane@ACME.com", "billing")?;

    let names: Vec<&str> = report.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "cloud-dev-jane-billing",
            "jane-billing.dev.acme.io",
            "billing",
            "cloud-dev-jane-billing",
            "cloud-dev-jane-billing",
            "jane-billing.dev.acme.io",
            "jane-billing.dev.acme.io",
            "janebilling",
        ]
    );
    assert!(report.is_complete());
    Ok(())
}
