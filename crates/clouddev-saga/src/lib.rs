//! Saga pattern implementation for multi-resource provisioning.
//!
//! A saga is a sequence of steps that each create an external resource and
//! know how to remove it again. If any step fails, every previously completed
//! compensable step is compensated in reverse order.
//!
//! Steps share one accumulated state value. Each step consumes the state,
//! records the handles it produced and hands it on; compensation later reads
//! those handles back out of the state.

mod audit;
mod builder;
mod error;
mod saga;
mod step;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::{Empty, HasSteps, SagaBuilder};
pub use error::{CompensationError, SagaError};
pub use saga::Saga;
pub use step::SagaStep;
