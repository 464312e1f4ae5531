use crate::ErrorKind;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Per-category counts of rejected candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorTally {
    counts: [u64; ErrorKind::COUNT],
}

impl ErrorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one rejection. `NoError` is not a bucket and is ignored.
    pub fn record(&mut self, kind: ErrorKind) {
        if kind == ErrorKind::NoError {
            return;
        }
        self.counts[usize::from(kind.code())] += 1;
    }

    pub const fn count(&self, kind: ErrorKind) -> u64 {
        self.counts[kind.code() as usize]
    }

    /// Sum over every failure category
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Failure categories with their counts, in code order, zeros included
    pub fn iter(&self) -> impl Iterator<Item = (ErrorKind, u64)> + '_ {
        ErrorKind::failures().map(|kind| (kind, self.count(kind)))
    }
}

impl Extend<ErrorKind> for ErrorTally {
    fn extend<I: IntoIterator<Item = ErrorKind>>(&mut self, iter: I) {
        for kind in iter {
            self.record(kind);
        }
    }
}

impl FromIterator<ErrorKind> for ErrorTally {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        let mut tally = Self::new();
        tally.extend(iter);
        tally
    }
}

// Keyed by report label so the JSON report reads like the text one.
impl Serialize for ErrorTally {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(ErrorKind::COUNT - 1))?;
        for (kind, count) in self.iter() {
            map.serialize_entry(kind.label(), &count)?;
        }
        map.end()
    }
}
