use clouddev_core::OwnerTag;

use crate::Result;
use crate::specs::RepositoryRef;

pub trait ContainerRegistry: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the registry cannot be queried.
    fn repository_exists(&self, name: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be created or already exists.
    fn create_repository(&self, name: &str, owner: &OwnerTag) -> Result<RepositoryRef>;

    /// Deletes the repository and its images. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository exists but cannot be deleted.
    fn delete_repository(&self, name: &str) -> Result<bool>;
}
