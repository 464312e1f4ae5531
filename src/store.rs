//! Insertion-ordered set of accepted dates.

use indexmap::IndexSet;

/// Error type for dedup store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Growing the store failed. The store is unchanged.
    #[error("Failed allocating space for {len} stored dates: {source}")]
    Allocation {
        len: usize,
        #[source]
        source: indexmap::TryReserveError,
    },
}

/// Accepted date strings, each held once, in first-seen order.
///
/// Membership is exact byte comparison on the text handed in, so callers
/// trim before asking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupStore {
    dates: IndexSet<String>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `date` has been inserted before
    pub fn contains(&self, date: &str) -> bool {
        self.dates.contains(date)
    }

    /// Inserts `date` unless already present.
    ///
    /// Returns `true` if the date was new. A duplicate leaves the store as
    /// it was and returns `false`.
    ///
    /// # Errors
    /// Returns `StoreError::Allocation` if space for the new entry cannot be
    /// reserved. Nothing is inserted in that case.
    pub fn insert(&mut self, date: &str) -> Result<bool, StoreError> {
        if self.dates.contains(date) {
            return Ok(false);
        }
        self.dates
            .try_reserve(1)
            .map_err(|source| StoreError::Allocation {
                len: self.dates.len(),
                source,
            })?;
        Ok(self.dates.insert(date.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates stored dates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dates.iter().map(String::as_str)
    }
}
