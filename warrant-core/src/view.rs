// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use crate::attributes::AttributeSet;
use crate::identity::ScopeId;
use crate::pattern::PermissionPattern;

/// Flattened outcome of resolving one subject in one scope.
///
/// Holds the winning state per distinct permission string. Capabilities not present verbatim are
/// answered by pattern matching against these entries, never by resolving again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedView<ID> {
    subject: ID,
    scope: Option<ScopeId>,
    attributes: AttributeSet,
    permissions: BTreeMap<String, bool>,
    patterns: Vec<(PermissionPattern, bool)>,
}

impl<ID> ResolvedView<ID> {
    pub fn new(
        subject: ID,
        scope: Option<ScopeId>,
        attributes: AttributeSet,
        permissions: BTreeMap<String, bool>,
    ) -> Self {
        let patterns = permissions
            .iter()
            .filter_map(|(key, state)| {
                PermissionPattern::parse(key)
                    .ok()
                    .map(|pattern| (pattern, *state))
            })
            .collect();

        Self {
            subject,
            scope,
            attributes,
            permissions,
            patterns,
        }
    }

    /// View granting nothing and carrying no attributes.
    pub fn empty(subject: ID, scope: Option<ScopeId>) -> Self {
        Self::new(subject, scope, AttributeSet::empty(), BTreeMap::new())
    }

    pub fn subject(&self) -> &ID {
        &self.subject
    }

    pub fn scope(&self) -> Option<&ScopeId> {
        self.scope.as_ref()
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Winning state for every distinct permission string, keyed by its canonical form.
    pub fn permissions(&self) -> &BTreeMap<String, bool> {
        &self.permissions
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.attributes.is_empty()
    }

    /// Look up the state of a capability, `None` if no entry covers it.
    pub fn get(&self, capability: &str) -> Option<bool> {
        let key = capability.to_lowercase();
        if let Some(state) = self.permissions.get(&key) {
            return Some(*state);
        }

        let candidate = PermissionPattern::parse(&key).ok()?;

        self.patterns
            .iter()
            .filter(|(pattern, _)| pattern.matches(&candidate))
            .max_by_key(|(pattern, _)| pattern.specificity())
            .map(|(_, state)| *state)
    }

    /// Returns `true` if the capability is allowed.
    ///
    /// Exact entries are answered directly, otherwise the most specific matching entry decides.
    /// Anything unmatched or unparseable is denied.
    pub fn check(&self, capability: &str) -> bool {
        self.get(capability).unwrap_or(false)
    }
}
