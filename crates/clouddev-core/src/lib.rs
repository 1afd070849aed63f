pub mod error;
mod identity;
mod naming;
mod priority;
pub mod types;

pub use error::*;
pub use identity::UserIdentity;
pub use naming::{
    DeploymentNames, TARGET_GROUP_NAME_MAX_LEN, derive_domain_label, derive_service_name,
    derive_target_group_name,
};
pub use priority::{HTTP_PRIORITY_RANGE, HTTPS_PRIORITY_RANGE, ListenerPriorities};
pub use types::*;
