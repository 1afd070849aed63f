//! In-memory stand-ins for every provider, sharing one call log.
//!
//! [`MockCloud`] keeps the set of resources that currently exist, so a create
//! followed by a delete leaves it empty again and a second create trips the
//! preflight checks.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use clouddev_core::{ListenerKind, OwnerTag, ResourceKind};

use crate::environment::{DeploymentEnvironment, DeploymentRequest, DeploymentSecrets};
use crate::operations::ProviderSet;
use crate::specs::{
    AliasTarget, ImageBuildRequest, RepositoryRef, ServiceRef, ServiceSpec, TargetGroupRef,
    TargetGroupSpec, TaskDefinitionRef, TaskDefinitionSpec,
};
use crate::traits::{
    ComputeServices, ContainerRegistry, DnsRecords, HealthProbe, ImageBuilder, ListenerRules,
    LogIndex, ProbeOutcome, SecretStore, TargetGroups, TaskDefinitions,
};
use crate::{OperationError, Result};

#[must_use]
pub fn sample_environment() -> DeploymentEnvironment {
    DeploymentEnvironment {
        region: "eu-west-1".to_string(),
        account_id: "123456789012".to_string(),
        cluster: "cloud-dev".to_string(),
        vpc_id: "vpc-1".to_string(),
        subnet_id: "subnet-1".to_string(),
        security_group_id: "sg-1".to_string(),
        task_role_name: "cloud-dev-task".to_string(),
        execution_role_name: "cloud-dev-exec".to_string(),
        hosted_zone_id: "Z1".to_string(),
        hosted_zone_domain: "dev.acme.io".to_string(),
        load_balancer_dns_name: "lb.eu-west-1.elb.amazonaws.com".to_string(),
        load_balancer_zone_id: "Z32O12XQLNTSW2".to_string(),
        https_listener_arn: "arn:https".to_string(),
        http_listener_arn: "arn:http".to_string(),
        elasticsearch_host: "es.acme.io".to_string(),
        elasticsearch_user: "logs".to_string(),
        kibana_host: "kibana.acme.io".to_string(),
        company_domain: "acme".to_string(),
        github_organisation: "acme".to_string(),
        log_router_image: "public.ecr.aws/aws-observability/aws-for-fluent-bit:stable"
            .to_string(),
        health_warmup_secs: 0,
        checkout_dir: None,
        aws_endpoint_url: None,
    }
}

#[must_use]
pub fn sample_request() -> DeploymentRequest {
    DeploymentRequest {
        email: "jane@acme.com".to_string(),
        app_name: "billing".to_string(),
        container_port: 8080,
        health_check_path: "health".to_string(),
        source_repository: "billing".to_string(),
        branch: "main".to_string(),
        source_secret: "billing-dev".to_string(),
    }
}

#[must_use]
pub fn sample_secrets() -> DeploymentSecrets {
    DeploymentSecrets {
        elasticsearch_password: "es-pass".to_string(),
        kibana_user: "kibana".to_string(),
        kibana_password: "kb-pass".to_string(),
        github_user: None,
        github_password: None,
    }
}

fn injected(call: &str) -> OperationError {
    OperationError::Provider {
        resource: resource_of(call),
        message: format!("injected failure in {call}"),
    }
}

fn resource_of(call: &str) -> ResourceKind {
    match call {
        c if c.contains("repository") || c == "build_and_push" => ResourceKind::Repository,
        c if c.contains("secret") => ResourceKind::Secret,
        c if c.contains("task_definition") => ResourceKind::TaskDefinition,
        c if c.contains("target_group") => ResourceKind::TargetGroup,
        c if c.contains("dns") => ResourceKind::DnsRecord,
        c if c.starts_with("https_") => ResourceKind::HttpsRule,
        c if c.starts_with("http_") => ResourceKind::HttpRule,
        c if c.contains("log_index") => ResourceKind::LogIndex,
        _ => ResourceKind::ComputeService,
    }
}

/// Shared state behind every mock provider.
///
/// Calls are logged as `name:argument`. Resources are keyed by kind and name;
/// the stored value is the identifier handed back to callers.
pub struct MockCloud {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    resources: Mutex<BTreeMap<(ResourceKind, String), String>>,
    rule_priorities: Mutex<Vec<(ListenerKind, u16)>>,
    probe_status: Mutex<u16>,
    next_revision: Mutex<u32>,
}

impl MockCloud {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            resources: Mutex::new(BTreeMap::new()),
            rule_priorities: Mutex::new(Vec::new()),
            probe_status: Mutex::new(200),
            next_revision: Mutex::new(1),
        }
    }

    /// Makes every call named `call` fail from now on.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn failing_on(self, call: &str) -> Self {
        self.fail_on(call);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_on(&self, call: &str) {
        self.failing
            .lock()
            .expect("lock poisoned")
            .insert(call.to_string());
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_probe_status(self, status: u16) -> Self {
        *self.probe_status.lock().expect("lock poisoned") = status;
        self
    }

    /// Seeds a resource as if it had been created earlier.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_existing(self, kind: ResourceKind, name: &str) -> Self {
        self.resources
            .lock()
            .expect("lock poisoned")
            .insert((kind, name.to_string()), format!("arn:existing/{name}"));
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Call names without their arguments, in call order.
    #[must_use]
    pub fn call_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.split(':').next().unwrap_or_default().to_string())
            .collect()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear_calls(&self) {
        self.calls.lock().expect("lock poisoned").clear();
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn resources(&self) -> Vec<(ResourceKind, String)> {
        self.resources
            .lock()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn has(&self, kind: ResourceKind, name: &str) -> bool {
        self.resources().contains(&(kind, name.to_string()))
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn rule_priorities(&self) -> Vec<(ListenerKind, u16)> {
        self.rule_priorities.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: &str, argument: &str) -> Result<()> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(format!("{call}:{argument}"));
        if self.failing.lock().expect("lock poisoned").contains(call) {
            return Err(injected(call));
        }
        Ok(())
    }

    fn exists(&self, kind: ResourceKind, name: &str) -> bool {
        self.resources
            .lock()
            .expect("lock poisoned")
            .contains_key(&(kind, name.to_string()))
    }

    fn insert(&self, kind: ResourceKind, name: &str, id: String) -> String {
        self.resources
            .lock()
            .expect("lock poisoned")
            .insert((kind, name.to_string()), id.clone());
        id
    }

    fn remove(&self, kind: ResourceKind, name: &str) -> bool {
        self.resources
            .lock()
            .expect("lock poisoned")
            .remove(&(kind, name.to_string()))
            .is_some()
    }

    fn remove_by_id(&self, kind: ResourceKind, id: &str) -> bool {
        let mut resources = self.resources.lock().expect("lock poisoned");
        let key = resources
            .iter()
            .find(|((k, _), v)| *k == kind && v.as_str() == id)
            .map(|(key, _)| key.clone());
        key.is_some_and(|key| resources.remove(&key).is_some())
    }

    fn find(&self, kind: ResourceKind, name: &str) -> Option<String> {
        self.resources
            .lock()
            .expect("lock poisoned")
            .get(&(kind, name.to_string()))
            .cloned()
    }

    /// Wires every provider slot to this cloud.
    #[must_use]
    pub fn provider_set(self: &Arc<Self>) -> ProviderSet {
        ProviderSet {
            registry: self.clone(),
            secrets: self.clone(),
            task_definitions: self.clone(),
            target_groups: self.clone(),
            dns: self.clone(),
            https_rules: Arc::new(MockListenerRules::new(ListenerKind::Https, self.clone())),
            http_rules: Arc::new(MockListenerRules::new(ListenerKind::Http, self.clone())),
            services: self.clone(),
            log_index: self.clone(),
            health: self.clone(),
            images: self.clone(),
        }
    }
}

impl Default for MockCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRegistry for MockCloud {
    fn repository_exists(&self, name: &str) -> Result<bool> {
        self.record("repository_exists", name)?;
        Ok(self.exists(ResourceKind::Repository, name))
    }

    fn create_repository(&self, name: &str, _owner: &OwnerTag) -> Result<RepositoryRef> {
        self.record("create_repository", name)?;
        let uri = format!("123456789012.dkr.ecr.eu-west-1.amazonaws.com/{name}");
        self.insert(ResourceKind::Repository, name, uri.clone());
        Ok(RepositoryRef {
            name: name.to_string(),
            uri,
        })
    }

    fn delete_repository(&self, name: &str) -> Result<bool> {
        self.record("delete_repository", name)?;
        Ok(self.remove(ResourceKind::Repository, name))
    }
}

impl SecretStore for MockCloud {
    fn copy_secret(&self, source_name: &str, dest_name: &str, _owner: &OwnerTag) -> Result<String> {
        self.record("copy_secret", &format!("{source_name}->{dest_name}"))?;
        self.insert(
            ResourceKind::Secret,
            dest_name,
            format!("arn:aws:secretsmanager:eu-west-1:123456789012:secret:{dest_name}"),
        );
        Ok(dest_name.to_string())
    }

    fn delete_secret(&self, name: &str) -> Result<bool> {
        self.record("delete_secret", name)?;
        Ok(self.remove(ResourceKind::Secret, name))
    }
}

impl TaskDefinitions for MockCloud {
    fn register(&self, spec: &TaskDefinitionSpec) -> Result<TaskDefinitionRef> {
        self.record("register_task_definition", &spec.family)?;
        let revision = {
            let mut next = self.next_revision.lock().expect("lock poisoned");
            let revision = *next;
            *next += 1;
            revision
        };
        let arn = format!(
            "arn:aws:ecs:eu-west-1:123456789012:task-definition/{}:{revision}",
            spec.family
        );
        self.insert(ResourceKind::TaskDefinition, &arn, arn.clone());
        Ok(TaskDefinitionRef {
            arn,
            family: spec.family.clone(),
        })
    }

    fn list_revisions(&self, family: &str) -> Result<Vec<String>> {
        self.record("list_task_definition_revisions", family)?;
        let marker = format!("task-definition/{family}:");
        Ok(self
            .resources()
            .into_iter()
            .filter(|(kind, name)| *kind == ResourceKind::TaskDefinition && name.contains(&marker))
            .map(|(_, name)| name)
            .collect())
    }

    fn deregister(&self, arns: &[String]) -> Result<()> {
        self.record("deregister_task_definitions", &arns.join(","))?;
        for arn in arns {
            self.remove(ResourceKind::TaskDefinition, arn);
        }
        Ok(())
    }
}

impl TargetGroups for MockCloud {
    fn create(&self, spec: &TargetGroupSpec) -> Result<TargetGroupRef> {
        self.record("create_target_group", &spec.name)?;
        let arn = format!(
            "arn:aws:elasticloadbalancing:eu-west-1:123456789012:targetgroup/{}/1",
            spec.name
        );
        self.insert(ResourceKind::TargetGroup, &spec.name, arn.clone());
        Ok(TargetGroupRef {
            arn,
            name: spec.name.clone(),
        })
    }

    fn lookup(&self, name: &str) -> Result<Option<String>> {
        self.record("lookup_target_group", name)?;
        Ok(self.find(ResourceKind::TargetGroup, name))
    }

    fn delete(&self, arn: &str) -> Result<bool> {
        self.record("delete_target_group", arn)?;
        Ok(self.remove_by_id(ResourceKind::TargetGroup, arn))
    }
}

impl DnsRecords for MockCloud {
    fn record_exists(&self, name: &str) -> Result<bool> {
        self.record("dns_record_exists", name)?;
        Ok(self.exists(ResourceKind::DnsRecord, name))
    }

    fn create_alias(&self, name: &str, target: &AliasTarget) -> Result<String> {
        self.record("create_dns_alias", name)?;
        self.insert(ResourceKind::DnsRecord, name, target.dns_name.clone());
        Ok(name.to_string())
    }

    fn delete_alias(&self, name: &str, _target: &AliasTarget) -> Result<bool> {
        self.record("delete_dns_alias", name)?;
        Ok(self.remove(ResourceKind::DnsRecord, name))
    }
}

impl ComputeServices for MockCloud {
    fn service_exists(&self, name: &str) -> Result<bool> {
        self.record("service_exists", name)?;
        Ok(self.exists(ResourceKind::ComputeService, name))
    }

    fn create(&self, spec: &ServiceSpec) -> Result<ServiceRef> {
        self.record("create_service", &spec.service_name)?;
        let arn = format!(
            "arn:aws:ecs:eu-west-1:123456789012:service/{}/{}",
            spec.cluster, spec.service_name
        );
        self.insert(ResourceKind::ComputeService, &spec.service_name, arn.clone());
        Ok(ServiceRef {
            name: spec.service_name.clone(),
            arn,
        })
    }

    fn force_redeploy(&self, name: &str, task_definition_arn: &str) -> Result<()> {
        self.record("force_redeploy", &format!("{name}@{task_definition_arn}"))
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.record("delete_service", name)?;
        Ok(self.remove(ResourceKind::ComputeService, name))
    }
}

impl LogIndex for MockCloud {
    fn create_index(&self, pattern: &str) -> Result<()> {
        self.record("create_log_index", pattern)?;
        self.insert(ResourceKind::LogIndex, pattern, pattern.to_string());
        Ok(())
    }
}

impl HealthProbe for MockCloud {
    fn probe(&self, domain: &str, path: &str) -> Result<ProbeOutcome> {
        self.record("probe_health", domain)?;
        Ok(ProbeOutcome {
            url: format!("https://{domain}/{}", path.trim_start_matches('/')),
            status: *self.probe_status.lock().expect("lock poisoned"),
        })
    }
}

impl ImageBuilder for MockCloud {
    fn build_and_push(&self, request: &ImageBuildRequest) -> Result<String> {
        self.record("build_and_push", &request.image_name)?;
        Ok(format!("{}:latest", request.registry_uri))
    }
}

/// One listener of the shared load balancer; calls are prefixed with the
/// listener (`https_` or `http_`).
pub struct MockListenerRules {
    kind: ListenerKind,
    cloud: Arc<MockCloud>,
}

impl MockListenerRules {
    #[must_use]
    pub fn new(kind: ListenerKind, cloud: Arc<MockCloud>) -> Self {
        Self { kind, cloud }
    }

    fn call(&self, name: &str) -> String {
        match self.kind {
            ListenerKind::Https => format!("https_{name}"),
            ListenerKind::Http => format!("http_{name}"),
        }
    }

    fn add_rule(&self, call: &str, host: &str, priority: u16) -> Result<String> {
        self.cloud.record(&self.call(call), host)?;
        self.cloud
            .rule_priorities
            .lock()
            .expect("lock poisoned")
            .push((self.kind, priority));
        let arn = format!("arn:rule/{}/{host}", self.kind);
        Ok(self.cloud.insert(self.kind.resource_kind(), host, arn))
    }
}

impl ListenerRules for MockListenerRules {
    fn listener(&self) -> ListenerKind {
        self.kind
    }

    fn host_rule_exists(&self, host: &str) -> Result<bool> {
        self.cloud.record(&self.call("host_rule_exists"), host)?;
        Ok(self.cloud.exists(self.kind.resource_kind(), host))
    }

    fn add_forward_rule(
        &self,
        host: &str,
        _target_group_arn: &str,
        priority: u16,
        _owner: &OwnerTag,
    ) -> Result<String> {
        self.add_rule("add_forward_rule", host, priority)
    }

    fn add_redirect_rule(&self, host: &str, priority: u16, _owner: &OwnerTag) -> Result<String> {
        self.add_rule("add_redirect_rule", host, priority)
    }

    fn find_rule_arn_by_host(&self, host: &str) -> Result<Option<String>> {
        self.cloud.record(&self.call("find_rule"), host)?;
        Ok(self.cloud.find(self.kind.resource_kind(), host))
    }

    fn delete_rule(&self, arn: &str) -> Result<bool> {
        self.cloud.record(&self.call("delete_rule"), arn)?;
        Ok(self.cloud.remove_by_id(self.kind.resource_kind(), arn))
    }
}
