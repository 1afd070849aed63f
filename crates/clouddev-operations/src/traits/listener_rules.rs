use clouddev_core::{ListenerKind, OwnerTag};

use crate::Result;

/// Host-header rules on one load-balancer listener.
pub trait ListenerRules: Send + Sync {
    fn listener(&self) -> ListenerKind;

    /// # Errors
    ///
    /// Returns an error if the listener's rules cannot be read.
    fn host_rule_exists(&self, host: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the rule cannot be created.
    fn add_forward_rule(
        &self,
        host: &str,
        target_group_arn: &str,
        priority: u16,
        owner: &OwnerTag,
    ) -> Result<String>;

    /// Adds a rule redirecting `host` to HTTPS.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule cannot be created.
    fn add_redirect_rule(&self, host: &str, priority: u16, owner: &OwnerTag) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the listener's rules cannot be read.
    fn find_rule_arn_by_host(&self, host: &str) -> Result<Option<String>>;

    /// Returns `false` if the rule did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule exists but cannot be deleted.
    fn delete_rule(&self, arn: &str) -> Result<bool>;
}
