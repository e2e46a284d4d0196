// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage interface feeding permission resolution.
//!
//! `warrant-store` defines which data a resolver needs about a subject, see [`PermissionStore`].
//! Persistence layout and schema are entirely up to the implementer, rows are handed out in their
//! raw [`GrantRecord`](warrant_core::GrantRecord) / [`GroupRecord`](warrant_core::GroupRecord)
//! form and validated on the consuming side.
//!
//! An in-memory implementation is provided in the form of a [`MemoryStore`], gated by the
//! `memory` feature flag which is enabled by default.
#[cfg(feature = "memory")]
pub mod memory;
mod traits;

#[cfg(feature = "memory")]
pub use memory::{MemoryStore, MemoryStoreError};
pub use traits::PermissionStore;
