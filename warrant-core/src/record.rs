// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw rows as handed out by a storage backend and their conversion into validated types.
//!
//! Storage contents are not trusted to be well-formed. A grant row with a malformed permission
//! string must not take down the resolution of the whole subject, so hydration swaps it for an
//! inert grant which never contributes to a resolved view. A group row without a usable name is
//! skipped.
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::attributes::AttributeSet;
use crate::grant::{EXPLICIT_PRIORITY, Grant, GrantId};
use crate::group::{Group, GroupName, GroupNameError, sort_by_priority};
use crate::identity::ScopeId;
use crate::pattern::PatternError;

/// Stored grant as it comes out of the backend, permission not yet parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrantRecord {
    pub id: GrantId,
    pub permission: String,
    pub scope: Option<ScopeId>,
    pub state: bool,
    pub priority: i32,
}

impl GrantRecord {
    /// Global grant record with priority zero.
    pub fn new(id: u64, permission: impl Into<String>, state: bool) -> Self {
        Self {
            id: GrantId::new(id),
            permission: permission.into(),
            scope: None,
            state,
            priority: 0,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl TryFrom<&GrantRecord> for Grant {
    type Error = PatternError;

    fn try_from(record: &GrantRecord) -> Result<Self, Self::Error> {
        Grant::parse(
            record.id,
            &record.permission,
            record.scope.clone(),
            record.state,
            record.priority,
        )
    }
}

impl Grant {
    /// Convert a stored row, replacing it with an inert grant if the permission is malformed.
    pub fn hydrate(record: &GrantRecord) -> Grant {
        match Grant::try_from(record) {
            Ok(grant) => grant,
            Err(err) => {
                warn!(
                    grant = %record.id,
                    permission = %record.permission,
                    "ignoring malformed stored grant: {}", err
                );
                Grant::inert(
                    record.id,
                    record.scope.clone(),
                    record.state,
                    record.priority,
                )
            }
        }
    }
}

/// Hydrate a subject's own grants, pinning every one of them to [`EXPLICIT_PRIORITY`].
pub fn hydrate_explicit(records: &[GrantRecord]) -> Vec<Grant> {
    records
        .iter()
        .map(|record| {
            let pinned = GrantRecord {
                priority: EXPLICIT_PRIORITY,
                ..record.clone()
            };
            Grant::hydrate(&pinned)
        })
        .collect()
}

/// Stored group definition including all of its grants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupRecord {
    pub name: String,
    pub display_name: Option<String>,
    pub priority: i32,
    pub is_default: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: AttributeSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<GrantRecord>,
}

impl GroupRecord {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            priority,
            is_default: false,
            attributes: AttributeSet::empty(),
            grants: Vec::new(),
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_grant(mut self, grant: GrantRecord) -> Self {
        self.grants.push(grant);
        self
    }

    /// Canonical name of the stored group, if it has a valid one.
    pub fn canonical_name(&self) -> Result<GroupName, GroupNameError> {
        GroupName::new(&self.name)
    }

    /// Convert the stored group and its grants, see [`Grant::hydrate`].
    pub fn hydrate(&self) -> Result<Group, GroupNameError> {
        let mut group = Group::new(&self.name, self.priority)?
            .with_default(self.is_default)
            .with_attributes(self.attributes.clone())
            .with_grants(self.grants.iter().map(Grant::hydrate));

        if let Some(display_name) = &self.display_name {
            group = group.with_display_name(display_name.clone());
        }

        Ok(group)
    }
}

/// Hydrate group memberships into resolution order.
///
/// Groups without a valid name are skipped and a group listed more than once (for example both as
/// default and explicit membership) is only kept the first time.
pub fn hydrate_groups(records: &[GroupRecord]) -> Vec<Group> {
    let mut seen = HashSet::new();
    let mut groups: Vec<Group> = records
        .iter()
        .filter_map(|record| match record.hydrate() {
            Ok(group) => Some(group),
            Err(err) => {
                warn!(group = %record.name, "ignoring malformed stored group: {}", err);
                None
            }
        })
        .filter(|group| seen.insert(group.name().clone()))
        .collect();

    sort_by_priority(&mut groups);
    groups
}
