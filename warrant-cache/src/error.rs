// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::fmt::{self, Display};

use thiserror::Error;

/// The three independent storage reads a resolution depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageInput {
    Attributes,
    Grants,
    Groups,
}

impl Display for StorageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageInput::Attributes => "explicit attributes",
            StorageInput::Grants => "explicit grants",
            StorageInput::Groups => "group memberships",
        };

        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum CacheError<E>
where
    E: Error + 'static,
{
    /// Storage failed to produce one of the inputs, nothing was cached.
    #[error("failed to fetch {input} of subject {subject}: {source}")]
    ResolutionFailed {
        subject: String,
        input: StorageInput,
        #[source]
        source: E,
    },
}

impl<E> CacheError<E>
where
    E: Error + 'static,
{
    pub(crate) fn resolution_failed(subject: &impl Display, input: StorageInput, source: E) -> Self {
        Self::ResolutionFailed {
            subject: subject.to_string(),
            input,
            source,
        }
    }
}

/// Errors when acquiring a [`BlockingContext`](crate::BlockingContext).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BlockingError {
    #[error("blocking is not allowed on a thread inside an async runtime")]
    InsideRuntime,
}
