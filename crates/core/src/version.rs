//! Optimistic concurrency for read-modify-write cycles on stored records.

use crate::error::{RepositoryError, RepositoryResult};

/// Version expectation passed to a repository write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (inserts, administrative overwrites).
    Any,
    /// Require the stored record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> RepositoryResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
