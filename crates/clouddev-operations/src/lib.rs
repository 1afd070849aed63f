mod environment;
mod error;
pub mod operations;
pub mod providers;
pub mod specs;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use environment::{DeploymentEnvironment, DeploymentRequest, DeploymentSecrets};
pub use error::{CompensationFailure, OperationError, Result, TeardownFailure};
