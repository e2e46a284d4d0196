// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent cache of resolved permissions.
//!
//! [`PermissionCache`] memoizes one [`ResolvedView`](warrant_core::ResolvedView) per subject and
//! scope. On a miss it reads the subject's attributes, grants and groups from a
//! [`PermissionStore`](warrant_store::PermissionStore) concurrently, resolves them and keeps the
//! result until it gets invalidated.
//!
//! Invalidation is driven from the outside, either by calling the `invalidate_*` methods directly
//! or by feeding [`InvalidationEvent`]s into [`PermissionCache::process_events`].
//!
//! ```
//! # use warrant_cache::{CacheConfig, PermissionCache};
//! # use warrant_core::{GrantRecord, GroupRecord};
//! # use warrant_store::MemoryStore;
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::<u64>::new();
//! store
//!     .insert_group(
//!         GroupRecord::new("default", 0)
//!             .with_default(true)
//!             .with_grant(GrantRecord::new(1, "chest.*", true)),
//!     )
//!     .await
//!     .unwrap();
//!
//! let cache = PermissionCache::new(store, CacheConfig::default());
//! let view = cache.get(&42, None).await.unwrap();
//! assert!(view.check("chest.iron"));
//! # }
//! ```
mod blocking;
mod cache;
mod config;
mod error;
mod event;
mod guard;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use blocking::BlockingContext;
pub use cache::PermissionCache;
pub use config::CacheConfig;
pub use error::{BlockingError, CacheError, StorageInput};
pub use event::InvalidationEvent;
pub use guard::{TargetGuard, Ticket};
