// SPDX-License-Identifier: MIT OR Apache-2.0

use tokio::sync::mpsc;
use tracing::{debug, warn};
use warrant_core::{GroupName, ScopeId, SubjectId};
use warrant_store::PermissionStore;

use crate::cache::PermissionCache;

/// Changes outside of the cache which make memoized views outdated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidationEvent<ID> {
    /// Subject moved to another scope.
    ScopeChanged { subject: ID, scope: Option<ScopeId> },

    /// Subject disconnected or got deleted.
    SubjectRemoved(ID),

    /// A group got created, deleted or its definition changed.
    GroupChanged(GroupName),

    /// Grants, attributes or memberships of the subject got edited.
    SubjectGrantsEdited(ID),

    /// Grants of the group got edited.
    GroupGrantsEdited(GroupName),
}

impl<ID, S> PermissionCache<ID, S>
where
    ID: SubjectId,
    S: PermissionStore<ID>,
{
    /// Invalidate whatever the event made outdated.
    ///
    /// A scope change additionally resolves the subject's view in its new scope right away.
    pub async fn handle_event(&self, event: InvalidationEvent<ID>) {
        match event {
            InvalidationEvent::ScopeChanged { subject, scope } => {
                self.invalidate_subject(&subject);
                if let Err(err) = self.change_scope(&subject, scope).await {
                    warn!("could not resolve permissions after scope change: {}", err);
                }
            }
            InvalidationEvent::SubjectRemoved(subject) => {
                self.remove_subject(&subject);
            }
            InvalidationEvent::SubjectGrantsEdited(subject) => {
                self.invalidate_subject(&subject);
            }
            InvalidationEvent::GroupChanged(group) | InvalidationEvent::GroupGrantsEdited(group) => {
                self.invalidate_group(&group);
            }
        }
    }

    /// Handle events until all senders of the channel are dropped.
    pub async fn process_events(&self, mut rx: mpsc::Receiver<InvalidationEvent<ID>>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event).await;
        }

        debug!("invalidation event channel closed");
    }
}
