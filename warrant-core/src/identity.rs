// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of the entity permissions are resolved for.
pub trait SubjectId: Clone + Debug + Display + Eq + Hash + Ord {}

impl SubjectId for char {}
impl SubjectId for u64 {}
impl SubjectId for String {}

/// Identifier of a partition (a world, a tenant, ..) in which grants can apply.
///
/// Scopes are compared exactly. Where an optional scope is expected, `None` stands for "global".
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ScopeId(String);

impl ScopeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ScopeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScopeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Formats an optional scope for logs and error messages.
pub(crate) struct DisplayScope<'a>(pub Option<&'a ScopeId>);

impl Display for DisplayScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(scope) => write!(f, "{}", scope),
            None => write!(f, "<global>"),
        }
    }
}

/// Human-readable representation of an optional scope.
pub fn display_scope(scope: Option<&ScopeId>) -> impl Display + '_ {
    DisplayScope(scope)
}
