mod compute_services;
mod container_registry;
mod dns_records;
mod health_probe;
mod image_builder;
mod listener_rules;
mod log_index;
mod secret_store;
mod target_groups;
mod task_definitions;

pub use compute_services::ComputeServices;
pub use container_registry::ContainerRegistry;
pub use dns_records::DnsRecords;
pub use health_probe::{HEALTHY_STATUSES, HealthProbe, ProbeOutcome};
pub use image_builder::ImageBuilder;
pub use listener_rules::ListenerRules;
pub use log_index::LogIndex;
pub use secret_store::SecretStore;
pub use target_groups::TargetGroups;
pub use task_definitions::TaskDefinitions;
