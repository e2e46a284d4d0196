// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conflict resolution between a subject's own grants and the grants of its groups.
//!
//! Resolution is pure and deterministic: the same inputs always produce the same view. All grants
//! applying to the requested scope are bucketed by their canonical permission string and every
//! bucket is decided by a single winner, picked by
//!
//! 1. higher specificity, then
//! 2. higher priority, then
//! 3. earlier position (explicit grants first, then groups in resolution order).
//!
//! Specificity comes before priority so that a narrow deny like `x.y.z` is able to beat a broad
//! `x.*` allow coming from a high-priority group. Explicit grants carry the maximum priority and
//! win every remaining tie.
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::Display;

use tracing::{debug, trace};

use crate::attributes::AttributeSet;
use crate::grant::Grant;
use crate::group::Group;
use crate::identity::{ScopeId, display_scope};
use crate::view::ResolvedView;

/// Resolve the view of a subject in the given scope.
///
/// `groups` may come in any order, they are taken in resolution order (see
/// [`Group::resolution_order`]).
pub fn resolve<ID>(
    subject: ID,
    scope: Option<&ScopeId>,
    explicit_attributes: &AttributeSet,
    explicit_grants: &[Grant],
    groups: &[Group],
) -> ResolvedView<ID>
where
    ID: Display,
{
    let mut ordered: Vec<&Group> = groups.iter().collect();
    ordered.sort_by(|a, b| Group::resolution_order(a, b));

    let attributes = merge_attributes(explicit_attributes, ordered.iter().copied());

    let candidates = explicit_grants
        .iter()
        .chain(ordered.iter().copied().flat_map(Group::grants))
        .filter(|grant| !grant.is_inert())
        .filter(|grant| grant.applies_to(scope));

    let mut winners: BTreeMap<String, &Grant> = BTreeMap::new();
    for grant in candidates {
        match winners.entry(grant.pattern().as_string()) {
            Entry::Vacant(entry) => {
                entry.insert(grant);
            }
            Entry::Occupied(mut entry) => {
                if outranks(grant, entry.get()) {
                    trace!(winner = %grant, loser = %entry.get(), "grant conflict");
                    entry.insert(grant);
                }
            }
        }
    }

    let permissions: BTreeMap<String, bool> = winners
        .into_iter()
        .map(|(key, grant)| (key, grant.state()))
        .collect();

    debug!(
        subject = %subject,
        scope = %display_scope(scope),
        entries = permissions.len(),
        "resolved permissions"
    );

    ResolvedView::new(subject, scope.cloned(), attributes, permissions)
}

/// Layer the subject's own attributes over the groups' ones, highest priority group first.
pub fn resolve_attributes(explicit_attributes: &AttributeSet, groups: &[Group]) -> AttributeSet {
    let mut ordered: Vec<&Group> = groups.iter().collect();
    ordered.sort_by(|a, b| Group::resolution_order(a, b));
    merge_attributes(explicit_attributes, ordered)
}

fn merge_attributes<'a>(
    explicit_attributes: &AttributeSet,
    groups: impl IntoIterator<Item = &'a Group>,
) -> AttributeSet {
    groups
        .into_iter()
        .fold(explicit_attributes.clone(), |merged, group| {
            merged.merge(group.attributes())
        })
}

/// Returns `true` if `challenger` beats `current`, ties keep the current grant.
fn outranks(challenger: &Grant, current: &Grant) -> bool {
    let challenger_rank = (challenger.pattern().specificity(), challenger.priority());
    let current_rank = (current.pattern().specificity(), current.priority());
    challenger_rank > current_rank
}
