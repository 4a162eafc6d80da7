//! Row classification by bicluster membership count.
//!
//! Classification is always recomputed from the current bicluster state,
//! never patched incrementally; the resolvers batch their mutations per
//! row precisely so this full re-scan stays affordable.

use crate::biclusters::BiclusterSet;

/// Partition of `[0, total_rows)` by membership count, with the backing
/// count vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowClasses {
    pub counts: Vec<usize>,
    pub ungrouped: Vec<usize>,
    pub grouped: Vec<usize>,
    pub overlapped: Vec<usize>,
}

impl RowClasses {
    /// Partition rows given an already-computed membership count vector.
    pub fn from_counts(counts: Vec<usize>) -> RowClasses {
        let mut ungrouped = Vec::new();
        let mut grouped = Vec::new();
        let mut overlapped = Vec::new();
        for (row, &count) in counts.iter().enumerate() {
            match count {
                0 => ungrouped.push(row),
                1 => grouped.push(row),
                _ => overlapped.push(row),
            }
        }
        RowClasses {
            counts,
            ungrouped,
            grouped,
            overlapped,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.counts.len()
    }
}

/// Classify every row of the dataset against the current bicluster state.
pub fn classify(set: &BiclusterSet) -> RowClasses {
    RowClasses::from_counts(set.membership_counts())
}
