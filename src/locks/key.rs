//! Lock key derivation.

use crate::error::{LockError, Result};
use std::fmt;

/// Backend key for one workflow's execution lock: `namespace:workflowId`.
///
/// Both parts must be non-empty after trimming. The key itself is built from
/// the values as given; trimming is only used to detect blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey(String);

impl LockKey {
    /// Validate the parts and build the key.
    ///
    /// # Returns
    ///
    /// * `Ok(LockKey)` - `namespace:workflow_id`
    /// * `Err(LockError::Validation)` - Either part is empty or whitespace-only
    pub fn new(namespace: &str, workflow_id: &str) -> Result<Self> {
        if workflow_id.trim().is_empty() {
            return Err(LockError::Validation(
                "Workflow ID cannot be empty".to_string(),
            ));
        }

        if namespace.trim().is_empty() {
            return Err(LockError::Validation("Namespace cannot be empty".to_string()));
        }

        Ok(Self(format!("{}:{}", namespace, workflow_id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LockKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
