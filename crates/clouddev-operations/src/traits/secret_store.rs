use clouddev_core::OwnerTag;

use crate::Result;

pub trait SecretStore: Send + Sync {
    /// Creates `dest_name` holding the current value of `source_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the copy cannot be created.
    fn copy_secret(&self, source_name: &str, dest_name: &str, owner: &OwnerTag) -> Result<String>;

    /// Returns `false` if the secret did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret exists but cannot be deleted.
    fn delete_secret(&self, name: &str) -> Result<bool>;
}
