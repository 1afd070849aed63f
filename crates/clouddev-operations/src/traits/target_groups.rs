use crate::Result;
use crate::specs::{TargetGroupRef, TargetGroupSpec};

pub trait TargetGroups: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the target group cannot be created.
    fn create(&self, spec: &TargetGroupSpec) -> Result<TargetGroupRef>;

    /// # Errors
    ///
    /// Returns an error if target groups cannot be queried.
    fn lookup(&self, name: &str) -> Result<Option<String>>;

    /// Returns `false` if the target group did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the target group exists but cannot be deleted.
    fn delete(&self, arn: &str) -> Result<bool>;
}
