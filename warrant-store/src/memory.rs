// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use warrant_core::{AttributeSet, GrantId, GrantRecord, GroupName, GroupNameError, GroupRecord};

use crate::traits::PermissionStore;

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    InvalidGroupName(#[from] GroupNameError),

    #[error("group '{0}' does not exist")]
    UnknownGroup(GroupName),
}

/// In-memory store.
///
/// This does not persist data permanently, all changes are lost when the process ends. Use this
/// only in development or test contexts. Clones share the same underlying data.
#[derive(Clone, Debug)]
pub struct MemoryStore<ID> {
    inner: Arc<RwLock<MemoryStoreInner<ID>>>,
}

#[derive(Debug)]
struct MemoryStoreInner<ID> {
    groups: BTreeMap<GroupName, GroupRecord>,
    memberships: BTreeMap<ID, BTreeSet<GroupName>>,
    attributes: BTreeMap<ID, AttributeSet>,
    grants: BTreeMap<ID, Vec<GrantRecord>>,
}

impl<ID> MemoryStore<ID> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                groups: BTreeMap::new(),
                memberships: BTreeMap::new(),
                attributes: BTreeMap::new(),
                grants: BTreeMap::new(),
            })),
        }
    }
}

impl<ID> Default for MemoryStore<ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> MemoryStore<ID>
where
    ID: Clone + Ord,
{
    /// Inserts or replaces a group definition under its canonical name.
    ///
    /// Returns `true` if the group did not exist before.
    pub async fn insert_group(&self, group: GroupRecord) -> Result<bool, MemoryStoreError> {
        let name = group.canonical_name()?;
        let mut inner = self.inner.write().await;
        Ok(inner.groups.insert(name, group).is_none())
    }

    /// Removes a group and every membership pointing at it.
    pub async fn remove_group(&self, name: &str) -> Result<bool, MemoryStoreError> {
        let name = GroupName::new(name)?;
        let mut inner = self.inner.write().await;
        for groups in inner.memberships.values_mut() {
            groups.remove(&name);
        }
        Ok(inner.groups.remove(&name).is_some())
    }

    /// Adds a grant to an existing group, replacing any grant with the same id.
    pub async fn insert_group_grant(
        &self,
        name: &str,
        grant: GrantRecord,
    ) -> Result<(), MemoryStoreError> {
        let name = GroupName::new(name)?;
        let mut inner = self.inner.write().await;
        let group = inner
            .groups
            .get_mut(&name)
            .ok_or(MemoryStoreError::UnknownGroup(name))?;
        group.grants.retain(|existing| existing.id != grant.id);
        group.grants.push(grant);
        Ok(())
    }

    /// Makes the subject an explicit member of an existing group.
    ///
    /// Returns `true` if the subject was not a member before.
    pub async fn add_member(&self, subject: ID, name: &str) -> Result<bool, MemoryStoreError> {
        let name = GroupName::new(name)?;
        let mut inner = self.inner.write().await;
        if !inner.groups.contains_key(&name) {
            return Err(MemoryStoreError::UnknownGroup(name));
        }
        Ok(inner.memberships.entry(subject).or_default().insert(name))
    }

    pub async fn remove_member(&self, subject: &ID, name: &str) -> Result<bool, MemoryStoreError> {
        let name = GroupName::new(name)?;
        let mut inner = self.inner.write().await;
        Ok(inner
            .memberships
            .get_mut(subject)
            .is_some_and(|groups| groups.remove(&name)))
    }

    pub async fn set_attributes(&self, subject: ID, attributes: AttributeSet) {
        let mut inner = self.inner.write().await;
        inner.attributes.insert(subject, attributes);
    }

    /// Stores a grant owned by the subject, replacing any grant with the same id.
    ///
    /// The permission string is kept as-is, even when it is malformed.
    pub async fn insert_grant(&self, subject: ID, grant: GrantRecord) {
        let mut inner = self.inner.write().await;
        let grants = inner.grants.entry(subject).or_default();
        grants.retain(|existing| existing.id != grant.id);
        grants.push(grant);
    }

    pub async fn remove_grant(&self, subject: &ID, id: GrantId) -> bool {
        let mut inner = self.inner.write().await;
        match inner.grants.get_mut(subject) {
            Some(grants) => {
                let before = grants.len();
                grants.retain(|existing| existing.id != id);
                grants.len() != before
            }
            None => false,
        }
    }

    /// Forgets everything stored about the subject.
    pub async fn remove_subject(&self, subject: &ID) {
        let mut inner = self.inner.write().await;
        inner.memberships.remove(subject);
        inner.attributes.remove(subject);
        inner.grants.remove(subject);
    }
}

impl<ID> PermissionStore<ID> for MemoryStore<ID>
where
    ID: Clone + Ord,
{
    type Error = MemoryStoreError;

    async fn explicit_attributes(&self, subject: &ID) -> Result<AttributeSet, Self::Error> {
        let inner = self.inner.read().await;
        Ok(inner.attributes.get(subject).cloned().unwrap_or_default())
    }

    async fn explicit_grants(&self, subject: &ID) -> Result<Vec<GrantRecord>, Self::Error> {
        let inner = self.inner.read().await;
        Ok(inner.grants.get(subject).cloned().unwrap_or_default())
    }

    async fn member_groups(&self, subject: &ID) -> Result<Vec<GroupRecord>, Self::Error> {
        let inner = self.inner.read().await;
        let explicit = inner.memberships.get(subject);
        let result = inner
            .groups
            .iter()
            .filter(|(name, group)| {
                group.is_default || explicit.is_some_and(|groups| groups.contains(*name))
            })
            .map(|(_, group)| group.clone())
            .collect();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use warrant_core::{AttributeSet, GrantId, GrantRecord, GroupRecord};

    use crate::traits::PermissionStore;

    use super::{MemoryStore, MemoryStoreError};

    #[tokio::test]
    async fn default_groups_apply_to_everyone() {
        let store = MemoryStore::<char>::new();
        store
            .insert_group(GroupRecord::new("Default", 0).with_default(true))
            .await
            .unwrap();
        store.insert_group(GroupRecord::new("vip", 10)).await.unwrap();

        let groups = store.member_groups(&'a').await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Default");

        assert!(store.add_member('a', "VIP").await.unwrap());
        assert!(!store.add_member('a', "vip").await.unwrap());

        let groups = store.member_groups(&'a').await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(store.member_groups(&'b').await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn membership_requires_existing_group() {
        let store = MemoryStore::<char>::new();
        assert!(matches!(
            store.add_member('a', "ghost").await,
            Err(MemoryStoreError::UnknownGroup(_))
        ));
        assert!(matches!(
            store.add_member('a', "  ").await,
            Err(MemoryStoreError::InvalidGroupName(_))
        ));
    }

    #[tokio::test]
    async fn removing_group_drops_memberships() {
        let store = MemoryStore::<char>::new();
        store.insert_group(GroupRecord::new("vip", 10)).await.unwrap();
        store.add_member('a', "vip").await.unwrap();

        assert!(store.remove_group("VIP").await.unwrap());
        assert!(store.member_groups(&'a').await.unwrap().is_empty());
        assert!(!store.remove_member(&'a', "vip").await.unwrap());
    }

    #[tokio::test]
    async fn grants_are_replaced_by_id() {
        let store = MemoryStore::<char>::new();
        store.insert_grant('a', GrantRecord::new(1, "fly", true)).await;
        store.insert_grant('a', GrantRecord::new(1, "fly", false)).await;
        store.insert_grant('a', GrantRecord::new(2, "", true)).await;

        let grants = store.explicit_grants(&'a').await.unwrap();
        assert_eq!(grants.len(), 2);
        assert!(!grants[0].state);

        assert!(store.remove_grant(&'a', GrantId::new(2)).await);
        assert!(!store.remove_grant(&'a', GrantId::new(2)).await);

        store.insert_group(GroupRecord::new("vip", 10)).await.unwrap();
        store
            .insert_group_grant("vip", GrantRecord::new(3, "chest.*", true))
            .await
            .unwrap();
        let groups = store.member_groups(&'a').await.unwrap();
        assert!(groups.is_empty());
        store.add_member('a', "vip").await.unwrap();
        let groups = store.member_groups(&'a').await.unwrap();
        assert_eq!(groups[0].grants.len(), 1);
    }

    #[tokio::test]
    async fn attributes_default_to_empty() {
        let store = MemoryStore::<char>::new();
        assert_eq!(
            store.explicit_attributes(&'a').await.unwrap(),
            AttributeSet::empty()
        );

        let attributes = AttributeSet::empty().with_chat_prefix("[VIP]");
        store.set_attributes('a', attributes.clone()).await;
        assert_eq!(store.explicit_attributes(&'a').await.unwrap(), attributes);

        store.remove_subject(&'a').await;
        assert!(store.explicit_attributes(&'a').await.unwrap().is_empty());
    }
}
