mod operation;
mod saga_data;
pub mod steps;

pub use operation::CreateOperation;
pub use saga_data::{ResourceHandles, WorkflowContext};
