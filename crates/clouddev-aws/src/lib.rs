//! Blocking facade over the AWS SDK clients cloud-dev talks to.
//!
//! [`AwsClients`] owns a current-thread runtime and one client per service.
//! Each service module adds blocking methods to it that take and return the
//! crate's own plain types, so callers never see SDK builders or futures.

mod client;
pub mod ecr;
pub mod ecs;
pub mod elbv2;
mod error;
pub mod route53;
pub mod secrets;

pub use client::AwsClients;
pub use error::{AwsError, Result};

/// A key/value resource tag; each service module converts it to its own SDK type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
