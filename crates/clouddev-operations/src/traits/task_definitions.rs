use crate::Result;
use crate::specs::{TaskDefinitionRef, TaskDefinitionSpec};

pub trait TaskDefinitions: Send + Sync {
    /// Registers a new revision of `spec.family`.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    fn register(&self, spec: &TaskDefinitionSpec) -> Result<TaskDefinitionRef>;

    /// # Errors
    ///
    /// Returns an error if the revisions cannot be listed.
    fn list_revisions(&self, family: &str) -> Result<Vec<String>>;

    /// Deregisters every given revision, attempting all of them.
    ///
    /// # Errors
    ///
    /// Returns an error naming the revisions that could not be deregistered.
    fn deregister(&self, arns: &[String]) -> Result<()>;
}
