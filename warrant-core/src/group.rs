// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::AttributeSet;
use crate::grant::Grant;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GroupNameError {
    #[error("group name is empty")]
    Empty,
}

/// Canonical group name, trimmed and lowercased. Identity key of a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: &str) -> Result<Self, GroupNameError> {
        let canonical = name.trim().to_lowercase();
        if canonical.is_empty() {
            return Err(GroupNameError::Empty);
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupName {
    type Err = GroupNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for GroupName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: String = Deserialize::deserialize(deserializer)?;
        GroupName::new(&raw)
            .map_err(|err| serde::de::Error::custom(format!("invalid group name, {}", err)))
    }
}

/// Named, prioritized bundle of grants and display attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    name: GroupName,
    display_name: String,
    priority: i32,
    is_default: bool,
    attributes: AttributeSet,
    grants: Vec<Grant>,
}

impl Group {
    /// Create a group, the display name keeps the casing of `name` while the canonical name is
    /// normalized.
    pub fn new(name: &str, priority: i32) -> Result<Self, GroupNameError> {
        Ok(Self {
            name: GroupName::new(name)?,
            display_name: name.trim().to_owned(),
            priority,
            is_default: false,
            attributes: AttributeSet::empty(),
            grants: Vec::new(),
        })
    }

    /// Mark every subject as an implicit member of this group.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_grant(mut self, grant: Grant) -> Self {
        self.grants.push(grant);
        self
    }

    pub fn with_grants(mut self, grants: impl IntoIterator<Item = Grant>) -> Self {
        self.grants.extend(grants);
        self
    }

    pub fn name(&self) -> &GroupName {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Resolution order: higher priority first, ties broken by canonical name.
    pub fn resolution_order(a: &Group, b: &Group) -> Ordering {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// Sort groups into resolution order, see [`Group::resolution_order`].
pub fn sort_by_priority(groups: &mut [Group]) {
    groups.sort_by(Group::resolution_order);
}

#[cfg(test)]
mod tests {
    use super::{Group, GroupName, GroupNameError, sort_by_priority};

    #[test]
    fn canonical_name_is_trimmed_and_lowercased() {
        let group = Group::new("  Moderator ", 10).unwrap();
        assert_eq!(group.name().as_str(), "moderator");
        assert_eq!(group.display_name(), "Moderator");
        assert_eq!(GroupName::new("   "), Err(GroupNameError::Empty));
    }

    #[test]
    fn sorts_by_priority_then_name() {
        let mut groups = vec![
            Group::new("default", 0).unwrap(),
            Group::new("Zeta", 10).unwrap(),
            Group::new("admin", 100).unwrap(),
            Group::new("alpha", 10).unwrap(),
        ];
        sort_by_priority(&mut groups);

        let names: Vec<&str> = groups.iter().map(|group| group.name().as_str()).collect();
        assert_eq!(names, vec!["admin", "alpha", "zeta", "default"]);
    }
}
