mod context;
mod create;
mod delete;
mod preflight;
mod update;

pub use context::{ProviderSet, resolve_names};
pub use create::{CreateOperation, ResourceHandles, WorkflowContext, steps};
pub use delete::{DeleteOperation, TeardownEntry, TeardownOutcome, TeardownReport};
pub use preflight::run_preflight;
pub use update::{UpdateOperation, UpdateOutput};
