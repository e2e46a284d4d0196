// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::identity::{ScopeId, display_scope};
use crate::pattern::{PatternError, PermissionPattern};

/// Priority pinned on every grant owned directly by a subject.
///
/// Being the maximum representable value it outranks any group grant of equal specificity, which
/// keeps conflict resolution a single comparison instead of a special case for explicit grants.
pub const EXPLICIT_PRIORITY: i32 = i32::MAX;

/// Opaque identifier of a grant, assigned by storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct GrantId(u64);

impl GrantId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Single allow or deny rule for one permission pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    id: GrantId,
    pattern: PermissionPattern,
    scope: Option<ScopeId>,
    state: bool,
    priority: i32,
}

impl Grant {
    pub fn new(
        id: GrantId,
        pattern: PermissionPattern,
        scope: Option<ScopeId>,
        state: bool,
        priority: i32,
    ) -> Self {
        Self {
            id,
            pattern,
            scope,
            state,
            priority,
        }
    }

    /// Grant owned directly by a subject, always carrying [`EXPLICIT_PRIORITY`].
    pub fn explicit(
        id: GrantId,
        pattern: PermissionPattern,
        scope: Option<ScopeId>,
        state: bool,
    ) -> Self {
        Self::new(id, pattern, scope, state, EXPLICIT_PRIORITY)
    }

    /// Parse the permission string and construct a grant from raw fields.
    pub fn parse(
        id: GrantId,
        permission: &str,
        scope: Option<ScopeId>,
        state: bool,
        priority: i32,
    ) -> Result<Self, PatternError> {
        let pattern = PermissionPattern::parse(permission)?;
        Ok(Self::new(id, pattern, scope, state, priority))
    }

    /// Grant which takes part in no resolution, used in place of a malformed stored grant.
    pub fn inert(id: GrantId, scope: Option<ScopeId>, state: bool, priority: i32) -> Self {
        Self::new(id, PermissionPattern::inert(), scope, state, priority)
    }

    pub fn id(&self) -> GrantId {
        self.id
    }

    pub fn pattern(&self) -> &PermissionPattern {
        &self.pattern
    }

    pub fn scope(&self) -> Option<&ScopeId> {
        self.scope.as_ref()
    }

    /// `true` for allow, `false` for deny.
    pub fn state(&self) -> bool {
        self.state
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_inert(&self) -> bool {
        self.pattern.is_inert()
    }

    /// Returns `true` if this grant takes part in a resolution for the given scope.
    ///
    /// Global grants apply everywhere, scoped grants only when the requested scope is exactly
    /// theirs. Resolving for the global scope itself therefore only picks up global grants.
    pub fn applies_to(&self, scope: Option<&ScopeId>) -> bool {
        match &self.scope {
            None => true,
            Some(own) => scope == Some(own),
        }
    }
}

impl Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{} @ {} (priority {})",
            self.id,
            if self.state { "+" } else { "-" },
            self.pattern,
            display_scope(self.scope.as_ref()),
            self.priority
        )
    }
}
