// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use warrant_core::ScopeId;

/// Configuration of a [`PermissionCache`](crate::PermissionCache).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Scope resolved when a subject is pre-fetched, `None` stands for the global scope.
    pub default_scope: Option<ScopeId>,

    /// Serve the last successfully resolved view when storage fails, instead of an empty one.
    pub fallback_on_error: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_scope: None,
            fallback_on_error: true,
        }
    }
}
