use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Workflow selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// Kinds of cloud resource a deployment is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Repository,
    Secret,
    TaskDefinition,
    TargetGroup,
    DnsRecord,
    HttpsRule,
    HttpRule,
    ComputeService,
    LogIndex,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Repository => "registry repository",
            Self::Secret => "secret",
            Self::TaskDefinition => "task definition",
            Self::TargetGroup => "target group",
            Self::DnsRecord => "DNS record",
            Self::HttpsRule => "HTTPS listener rule",
            Self::HttpRule => "HTTP listener rule",
            Self::ComputeService => "compute service",
            Self::LogIndex => "log index",
        };
        write!(f, "{s}")
    }
}

/// The two listeners sharing one load balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Https,
    Http,
}

impl ListenerKind {
    #[must_use]
    pub fn resource_kind(self) -> ResourceKind {
        match self {
            Self::Https => ResourceKind::HttpsRule,
            Self::Http => ResourceKind::HttpRule,
        }
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Https => write!(f, "HTTPS"),
            Self::Http => write!(f, "HTTP"),
        }
    }
}

/// Ownership tags attached to every taggable resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerTag {
    pub user_email: String,
}

impl OwnerTag {
    pub const USER_KEY: &'static str = "UserName";
    pub const POD_KEY: &'static str = "pod";
    pub const POD_VALUE: &'static str = "cloud-dev";

    #[must_use]
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
        }
    }

    /// Tag pairs in the order they are sent to providers.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (Self::USER_KEY, self.user_email.clone()),
            (Self::POD_KEY, Self::POD_VALUE.to_string()),
        ]
    }
}
