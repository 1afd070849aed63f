use crate::Result;
use crate::specs::AliasTarget;

pub trait DnsRecords: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the hosted zone cannot be queried.
    fn record_exists(&self, name: &str) -> Result<bool>;

    /// Creates an alias record and returns its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be created.
    fn create_alias(&self, name: &str, target: &AliasTarget) -> Result<String>;

    /// Returns `false` if the record did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be deleted.
    fn delete_alias(&self, name: &str, target: &AliasTarget) -> Result<bool>;
}
