// SPDX-License-Identifier: MIT OR Apache-2.0

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use warrant_core::ScopeId;

/// Tracks the scope every subject is currently heading to.
///
/// A scope change hands out a [`Ticket`]. Once the resolution for that change finishes, the ticket
/// tells if it is still the latest intent of the subject or if a newer scope change superseded it
/// in the meantime, in which case the result must not be applied.
#[derive(Debug)]
pub struct TargetGuard<ID>
where
    ID: Eq + Hash,
{
    targets: DashMap<ID, Target>,
    counter: AtomicU64,
}

#[derive(Clone, Debug)]
struct Target {
    scope: Option<ScopeId>,
    generation: u64,
}

/// Proof of one recorded scope change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket<ID> {
    subject: ID,
    scope: Option<ScopeId>,
    generation: u64,
}

impl<ID> Ticket<ID> {
    pub fn subject(&self) -> &ID {
        &self.subject
    }

    pub fn scope(&self) -> Option<&ScopeId> {
        self.scope.as_ref()
    }
}

impl<ID> TargetGuard<ID>
where
    ID: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            targets: DashMap::new(),
            counter: AtomicU64::new(0),
        }
    }

    /// Record the subject's new target scope, superseding all earlier tickets.
    pub fn set(&self, subject: ID, scope: Option<ScopeId>) -> Ticket<ID> {
        let generation = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.targets.insert(
            subject.clone(),
            Target {
                scope: scope.clone(),
                generation,
            },
        );

        Ticket {
            subject,
            scope,
            generation,
        }
    }

    /// Returns `true` if no newer scope change was recorded since this ticket was handed out.
    pub fn is_current(&self, ticket: &Ticket<ID>) -> bool {
        self.targets
            .get(&ticket.subject)
            .is_some_and(|target| target.generation == ticket.generation)
    }

    /// Returns the scope the subject is heading to, `None` if no scope change was ever recorded.
    pub fn current(&self, subject: &ID) -> Option<Option<ScopeId>> {
        self.targets.get(subject).map(|target| target.scope.clone())
    }

    /// Returns `true` if a result for `scope` may be applied to the subject, which is the case
    /// when it is the subject's current target or the subject has no target yet.
    pub fn allows(&self, subject: &ID, scope: Option<&ScopeId>) -> bool {
        self.targets
            .get(subject)
            .is_none_or(|target| target.scope.as_ref() == scope)
    }

    pub fn forget(&self, subject: &ID) {
        self.targets.remove(subject);
    }
}

impl<ID> Default for TargetGuard<ID>
where
    ID: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
