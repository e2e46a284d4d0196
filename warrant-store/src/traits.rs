// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use warrant_core::{AttributeSet, GrantRecord, GroupRecord};

/// Read interface to the backend holding subjects, groups and their grants.
///
/// The three reads are independent of each other and callers are free to run them concurrently.
/// Returned rows are not validated, hydrating them into [`warrant_core`] types is left to the
/// caller.
pub trait PermissionStore<ID> {
    type Error: Error + 'static;

    /// Returns the display attributes set directly on the subject, or an empty set.
    fn explicit_attributes(
        &self,
        subject: &ID,
    ) -> impl Future<Output = Result<AttributeSet, Self::Error>>;

    /// Returns all grants owned directly by the subject.
    ///
    /// These always resolve with the maximum priority, whatever priority is stored.
    fn explicit_grants(
        &self,
        subject: &ID,
    ) -> impl Future<Output = Result<Vec<GrantRecord>, Self::Error>>;

    /// Returns every group the subject belongs to, including all groups marked as default, each
    /// with its full list of grants.
    fn member_groups(
        &self,
        subject: &ID,
    ) -> impl Future<Output = Result<Vec<GroupRecord>, Self::Error>>;
}
