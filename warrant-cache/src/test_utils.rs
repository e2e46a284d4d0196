// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::Notify;
use warrant_core::{AttributeSet, GrantRecord, GroupRecord};
use warrant_store::{MemoryStore, MemoryStoreError, PermissionStore};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

#[derive(Debug, Error)]
pub enum TestStoreError {
    #[error("storage unavailable")]
    Unavailable,

    #[error(transparent)]
    Memory(#[from] MemoryStoreError),
}

/// Memory store which counts how often subjects get fetched and can be switched into failing.
///
/// When failing, group memberships can not be read while both other reads keep working.
///
/// A resolution can be held in flight with [`hold_next`](Self::hold_next): the next read of
/// explicit attributes takes its data and then waits until [`release`](Self::release) is called.
#[derive(Clone, Debug)]
pub struct CountingStore<ID> {
    memory: MemoryStore<ID>,
    fetches: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    hold: Arc<AtomicBool>,
    held: Arc<Notify>,
    released: Arc<Notify>,
}

impl<ID> CountingStore<ID> {
    pub fn new() -> Self {
        Self {
            memory: MemoryStore::new(),
            fetches: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
            hold: Arc::new(AtomicBool::new(false)),
            held: Arc::new(Notify::new()),
            released: Arc::new(Notify::new()),
        }
    }

    pub fn memory(&self) -> &MemoryStore<ID> {
        &self.memory
    }

    /// Number of times group memberships were requested, one per resolution.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold the next resolution after it read the subject's attributes.
    pub fn hold_next(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Wait until the held resolution arrived at the gate.
    pub async fn wait_held(&self) {
        self.held.notified().await;
    }

    /// Let the held resolution continue.
    pub fn release(&self) {
        self.released.notify_one();
    }
}

impl<ID> Default for CountingStore<ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> PermissionStore<ID> for CountingStore<ID>
where
    ID: Clone + Ord,
{
    type Error = TestStoreError;

    async fn explicit_attributes(&self, subject: &ID) -> Result<AttributeSet, Self::Error> {
        let attributes = self.memory.explicit_attributes(subject).await?;
        if self.hold.swap(false, Ordering::SeqCst) {
            self.held.notify_one();
            self.released.notified().await;
        }
        Ok(attributes)
    }

    async fn explicit_grants(&self, subject: &ID) -> Result<Vec<GrantRecord>, Self::Error> {
        Ok(self.memory.explicit_grants(subject).await?)
    }

    async fn member_groups(&self, subject: &ID) -> Result<Vec<GroupRecord>, Self::Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TestStoreError::Unavailable);
        }
        Ok(self.memory.member_groups(subject).await?)
    }
}
