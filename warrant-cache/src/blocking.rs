// SPDX-License-Identifier: MIT OR Apache-2.0

use tokio::runtime::Handle;

use crate::error::BlockingError;

/// Permission to block the current thread on asynchronous cache work.
///
/// Blocking is only acceptable in narrow, known-safe windows, for example a login hook which is
/// guaranteed to run on a dedicated thread outside of the async runtime. A context can only be
/// acquired on such a thread. Every thread which is itself driving or entered into a runtime is
/// refused, as blocking there would stall other tasks or panic.
#[derive(Debug)]
pub struct BlockingContext {
    handle: Handle,
}

impl BlockingContext {
    /// Acquire a blocking context which will drive futures on the given runtime.
    pub fn acquire(handle: Handle) -> Result<Self, BlockingError> {
        if Handle::try_current().is_ok() {
            return Err(BlockingError::InsideRuntime);
        }

        Ok(Self { handle })
    }

    /// Block the current thread until the future completes.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.handle.block_on(future)
    }
}
