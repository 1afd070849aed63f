use crate::Result;

pub trait LogIndex: Send + Sync {
    /// Makes logs matching `pattern` discoverable.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be created.
    fn create_index(&self, pattern: &str) -> Result<()>;
}
