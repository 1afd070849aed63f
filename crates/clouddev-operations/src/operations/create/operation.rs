use clouddev_saga::{Saga, SagaAuditLog, SagaBuilder};
use tracing::{error, info};

use super::saga_data::WorkflowContext;
use super::steps::{
    AddHttpRuleStep, AddHttpsRuleStep, BuildAndPushImageStep, CopySecretStep, CreateDnsRecordStep,
    CreateLogIndexStep, CreateServiceStep, CreateTargetGroupStep, ProbeHealthStep,
    RegisterTaskDefinitionStep,
};
use crate::environment::{DeploymentEnvironment, DeploymentRequest};
use crate::operations::{ProviderSet, run_preflight};
use crate::{OperationError, Result};

/// Provisions a complete environment, or nothing.
pub struct CreateOperation {
    providers: ProviderSet,
}

impl CreateOperation {
    #[must_use]
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    fn saga() -> Saga<WorkflowContext, ProviderSet, OperationError> {
        SagaBuilder::new()
            .first_step(BuildAndPushImageStep)
            .then(CopySecretStep)
            .then(RegisterTaskDefinitionStep)
            .then(CreateTargetGroupStep)
            .then(CreateDnsRecordStep)
            .then(AddHttpsRuleStep)
            .then(AddHttpRuleStep)
            .then(CreateServiceStep)
            .then(CreateLogIndexStep)
            .then(ProbeHealthStep)
            .build()
    }

    /// Step names in execution order.
    #[must_use]
    pub fn step_names() -> Vec<&'static str> {
        Self::saga().step_names()
    }

    /// Resolves names and runs the preflight checks; nothing is created.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity`, `PreflightConflict`, or the error of a
    /// failed existence check.
    pub fn prepare(
        &self,
        environment: &DeploymentEnvironment,
        request: &DeploymentRequest,
    ) -> Result<WorkflowContext> {
        let context = WorkflowContext::new(environment.clone(), request.clone())?;
        run_preflight(&self.providers, &context.names)?;
        Ok(context)
    }

    /// Runs the create saga on a prepared context.
    ///
    /// The audit log is returned whether the run succeeded or was rolled back.
    pub fn run(&self, context: WorkflowContext) -> (Result<WorkflowContext>, SagaAuditLog) {
        let service = context.names.service_name.clone();
        info!(service = %service, https = context.priorities.https, http = context.priorities.http, "create started");

        let (result, audit) = Self::saga().execute_with_audit(&self.providers, context);
        match &result {
            Ok(_) => info!(service = %service, "environment provisioned"),
            Err(err) => error!(service = %service, error = %err, "create rolled back"),
        }
        (result.map_err(OperationError::from), audit)
    }

    /// [`prepare`](Self::prepare) followed by [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns the preflight error, or `SagaFailed` / `SagaCompensationFailed`
    /// carrying the step error that started the rollback.
    pub fn execute(
        &self,
        environment: &DeploymentEnvironment,
        request: &DeploymentRequest,
    ) -> Result<WorkflowContext> {
        let context = self.prepare(environment, request)?;
        self.run(context).0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clouddev_core::ResourceKind;
    use clouddev_saga::StepStatus;

    use super::*;
    use crate::mocks::{MockCloud, sample_environment, sample_request};

    #[test]
    fn saga_has_ten_steps_in_order() {
        assert_eq!(
            CreateOperation::step_names(),
            vec![
                "build_and_push_image",
                "copy_secret",
                "register_task_definition",
                "create_target_group",
                "create_dns_record",
                "add_https_rule",
                "add_http_rule",
                "create_service",
                "create_log_index",
                "probe_health",
            ]
        );
    }

    #[test]
    fn successful_run_holds_every_handle() -> anyhow::Result<()> {
        let cloud = Arc::new(MockCloud::new());
        let operation = CreateOperation::new(cloud.provider_set());

        let context = operation.execute(&sample_environment(), &sample_request())?;

        assert!(context.is_fully_provisioned());
        assert!(context.handles.log_index_created);
        assert_eq!(
            context.handles.pushed_image.as_deref(),
            Some("123456789012.dkr.ecr.eu-west-1.amazonaws.com/billing:latest")
        );
        assert!(cloud.has(ResourceKind::ComputeService, "cloud-dev-jane-billing"));
        Ok(())
    }

    #[test]
    fn audit_log_marks_exempt_steps() -> anyhow::Result<()> {
        let cloud = Arc::new(MockCloud::new().with_probe_status(500));
        let operation = CreateOperation::new(cloud.provider_set());
        let context = operation.prepare(&sample_environment(), &sample_request())?;

        let (result, audit) = operation.run(context);

        assert!(result.is_err());
        assert_eq!(audit.steps_with_status(StepStatus::Failed), vec!["probe_health"]);
        assert_eq!(
            audit.steps_with_status(StepStatus::CompensationSkipped),
            vec!["create_log_index"]
        );
        assert_eq!(audit.steps_with_status(StepStatus::Compensated).len(), 8);
        Ok(())
    }
}
