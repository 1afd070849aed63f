//! The ten create steps, in execution order.

use clouddev_core::{ListenerKind, ResourceKind};
use clouddev_saga::SagaStep;
use tracing::{error, info, warn};

use super::saga_data::WorkflowContext;
use crate::operations::ProviderSet;
use crate::specs::{AliasTarget, ImageBuildRequest, ServiceSpec, TargetGroupSpec, TaskDefinitionSpec};
use crate::{OperationError, Result};

fn required<'a>(handle: Option<&'a String>, resource: ResourceKind) -> Result<&'a str> {
    handle.map(String::as_str).ok_or_else(|| OperationError::Provider {
        resource,
        message: "handle from an earlier step is missing".to_string(),
    })
}

/// A rollback delete that finds nothing is logged, not treated as a failure.
fn rolled_back(existed: bool, resource: ResourceKind, name: &str) {
    if existed {
        info!(resource = %resource, name, "rolled back");
    } else {
        warn!(resource = %resource, name, "already absent during rollback");
    }
}

/// Creates the registry repository, then builds and pushes the image into it.
///
/// A failed build or push removes the repository again before the error is
/// returned, so the step never leaves half its work behind.
pub struct BuildAndPushImageStep;

impl SagaStep for BuildAndPushImageStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "build_and_push_image"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let name = state.names.repository_name.clone();
        let repository = ctx.registry.create_repository(&name, &state.owner())?;
        info!(repository = %repository.name, uri = %repository.uri, "registry repository created");

        let pushed = ctx.images.build_and_push(&ImageBuildRequest {
            source_repository: state.request.source_repository.clone(),
            branch: state.request.branch.clone(),
            image_name: name.clone(),
            registry_uri: repository.uri.clone(),
        });
        match pushed {
            Ok(image) => {
                info!(image = %image, "image pushed");
                state.handles.repository_uri = Some(repository.uri);
                state.handles.pushed_image = Some(image);
                Ok(state)
            }
            Err(err) => {
                if let Err(cleanup) = ctx.registry.delete_repository(&name) {
                    error!(repository = %name, error = %cleanup, "repository left behind after failed push");
                }
                Err(err)
            }
        }
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if state.handles.repository_uri.is_some() {
            let name = &state.names.repository_name;
            rolled_back(ctx.registry.delete_repository(name)?, ResourceKind::Repository, name);
            state.handles.repository_uri = None;
            state.handles.pushed_image = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete registry repository and its images".to_string()
    }
}

pub struct CopySecretStep;

impl SagaStep for CopySecretStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "copy_secret"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let name = ctx.secrets.copy_secret(
            &state.request.source_secret,
            &state.names.secret_name,
            &state.owner(),
        )?;
        info!(source = %state.request.source_secret, secret = %name, "secret copied");
        state.handles.secret_name = Some(name);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if state.handles.secret_name.is_some() {
            let name = &state.names.secret_name;
            rolled_back(ctx.secrets.delete_secret(name)?, ResourceKind::Secret, name);
            state.handles.secret_name = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete copied secret".to_string()
    }
}

pub struct RegisterTaskDefinitionStep;

impl SagaStep for RegisterTaskDefinitionStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "register_task_definition"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let registry_uri = required(state.handles.repository_uri.as_ref(), ResourceKind::Repository)?;
        let spec = TaskDefinitionSpec::derive(
            &state.environment,
            &state.names,
            &state.request,
            registry_uri,
        );
        let registered = ctx.task_definitions.register(&spec)?;
        info!(arn = %registered.arn, "task definition registered");
        state.handles.task_definition_arn = Some(registered.arn);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if let Some(arn) = &state.handles.task_definition_arn {
            ctx.task_definitions.deregister(std::slice::from_ref(arn))?;
            info!(resource = %ResourceKind::TaskDefinition, name = %arn, "rolled back");
            state.handles.task_definition_arn = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "deregister task definition revision".to_string()
    }
}

pub struct CreateTargetGroupStep;

impl SagaStep for CreateTargetGroupStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_target_group"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let spec = TargetGroupSpec::derive(&state.environment, &state.names, &state.request);
        let group = ctx.target_groups.create(&spec)?;
        info!(name = %group.name, arn = %group.arn, "target group created");
        state.handles.target_group_arn = Some(group.arn);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if let Some(arn) = &state.handles.target_group_arn {
            rolled_back(ctx.target_groups.delete(arn)?, ResourceKind::TargetGroup, arn);
            state.handles.target_group_arn = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete target group".to_string()
    }
}

pub struct CreateDnsRecordStep;

impl SagaStep for CreateDnsRecordStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_dns_record"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let target = AliasTarget::load_balancer(&state.environment);
        let record = ctx.dns.create_alias(&state.names.full_domain_name, &target)?;
        info!(name = %record, "DNS alias created");
        state.handles.dns_record_name = Some(record);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if state.handles.dns_record_name.is_some() {
            let target = AliasTarget::load_balancer(&state.environment);
            let name = &state.names.full_domain_name;
            rolled_back(ctx.dns.delete_alias(name, &target)?, ResourceKind::DnsRecord, name);
            state.handles.dns_record_name = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete DNS alias record".to_string()
    }
}

fn ensure_host_free(listener: ListenerKind, rules: &ProviderSet, host: &str) -> Result<()> {
    let rules = match listener {
        ListenerKind::Https => &rules.https_rules,
        ListenerKind::Http => &rules.http_rules,
    };
    if rules.host_rule_exists(host)? {
        return Err(OperationError::ListenerHostTaken {
            listener,
            host: host.to_string(),
        });
    }
    Ok(())
}

/// Forwards the deployment's host to its target group.
pub struct AddHttpsRuleStep;

impl SagaStep for AddHttpsRuleStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "add_https_rule"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let host = state.names.full_domain_name.clone();
        ensure_host_free(ListenerKind::Https, ctx, &host)?;
        let target_group =
            required(state.handles.target_group_arn.as_ref(), ResourceKind::TargetGroup)?;
        let arn = ctx.https_rules.add_forward_rule(
            &host,
            target_group,
            state.priorities.https,
            &state.owner(),
        )?;
        info!(host = %host, priority = state.priorities.https, arn = %arn, "HTTPS rule added");
        state.handles.https_rule_arn = Some(arn);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if let Some(arn) = &state.handles.https_rule_arn {
            rolled_back(ctx.https_rules.delete_rule(arn)?, ResourceKind::HttpsRule, arn);
            state.handles.https_rule_arn = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete HTTPS listener rule".to_string()
    }
}

/// Redirects plain HTTP for the deployment's host to HTTPS.
pub struct AddHttpRuleStep;

impl SagaStep for AddHttpRuleStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "add_http_rule"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let host = state.names.full_domain_name.clone();
        ensure_host_free(ListenerKind::Http, ctx, &host)?;
        let arn = ctx
            .http_rules
            .add_redirect_rule(&host, state.priorities.http, &state.owner())?;
        info!(host = %host, priority = state.priorities.http, arn = %arn, "HTTP redirect rule added");
        state.handles.http_rule_arn = Some(arn);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if let Some(arn) = &state.handles.http_rule_arn {
            rolled_back(ctx.http_rules.delete_rule(arn)?, ResourceKind::HttpRule, arn);
            state.handles.http_rule_arn = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete HTTP listener rule".to_string()
    }
}

pub struct CreateServiceStep;

impl SagaStep for CreateServiceStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_service"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let spec = ServiceSpec {
            cluster: state.environment.cluster.clone(),
            service_name: state.names.service_name.clone(),
            task_definition_arn: required(
                state.handles.task_definition_arn.as_ref(),
                ResourceKind::TaskDefinition,
            )?
            .to_string(),
            target_group_arn: required(
                state.handles.target_group_arn.as_ref(),
                ResourceKind::TargetGroup,
            )?
            .to_string(),
            container_name: state.names.app_name.clone(),
            container_port: state.request.container_port,
            subnet_id: state.environment.subnet_id.clone(),
            security_group_id: state.environment.security_group_id.clone(),
            owner: state.owner(),
        };
        let service = ctx.services.create(&spec)?;
        info!(service = %service.name, arn = %service.arn, "compute service created");
        state.handles.service_arn = Some(service.arn);
        Ok(state)
    }

    fn compensate(&self, ctx: &ProviderSet, state: &mut WorkflowContext) -> Result<()> {
        if state.handles.service_arn.is_some() {
            let name = &state.names.service_name;
            rolled_back(ctx.services.delete(name)?, ResourceKind::ComputeService, name);
            state.handles.service_arn = None;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete compute service".to_string()
    }
}

/// Best effort: a failure is logged and the saga carries on.
pub struct CreateLogIndexStep;

impl SagaStep for CreateLogIndexStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_log_index"
    }

    fn execute(&self, ctx: &ProviderSet, mut state: WorkflowContext) -> Result<WorkflowContext> {
        let pattern = &state.names.log_index_pattern;
        match ctx.log_index.create_index(pattern) {
            Ok(()) => {
                info!(pattern = %pattern, "log index created");
                state.handles.log_index_created = true;
            }
            Err(err) => warn!(pattern = %pattern, error = %err, "log index not created"),
        }
        Ok(state)
    }

    fn is_compensable(&self) -> bool {
        false
    }
}

/// Success means provisioned and healthy; an unhealthy answer fails the saga.
pub struct ProbeHealthStep;

impl SagaStep for ProbeHealthStep {
    type State = WorkflowContext;
    type Context = ProviderSet;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "probe_health"
    }

    fn execute(&self, ctx: &ProviderSet, state: WorkflowContext) -> Result<WorkflowContext> {
        let outcome = ctx
            .health
            .probe(&state.names.full_domain_name, &state.request.health_check_path)?;
        if !outcome.is_healthy() {
            return Err(OperationError::HealthCheckFailed {
                url: outcome.url,
                status: outcome.status,
            });
        }
        info!(url = %outcome.url, status = outcome.status, "deployment healthy");
        Ok(state)
    }

    fn is_compensable(&self) -> bool {
        false
    }
}
