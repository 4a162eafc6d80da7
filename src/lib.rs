//! # bicluster_reconcile
//!
//! Reconciles a tabular dataset with a possibly-overlapping,
//! possibly-incomplete set of bicluster assignments so that every row
//! ends up belonging to exactly one bicluster, while preserving the
//! original bicluster definitions and the statistical shape of the data.
//!
//! ## Pipeline phases
//!
//! 1. **Classification**: partition rows by membership count
//!    (ungrouped / grouped / overlapped)
//! 2. **Overlap resolution**: split every multiply-assigned row into one
//!    physical row per membership via donor/target swaps
//! 3. **Ungrouped policy**: `replace`, `remove` or `nothing` for the rows
//!    no bicluster claims
//! 4. **Normalization**: min-max scale numeric columns
//! 5. **Reporting**: canonical bicluster description, classification
//!    statistics, column types and per-column summaries
//!
//! The whole pipeline is single-threaded and in-memory; donor and target
//! selection draw from an injectable generator so runs can be reproduced
//! with a seed.

pub mod biclusters;
pub mod classify;
pub mod config;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod table;

pub use biclusters::{Bicluster, BiclusterSet, MalformedSpecError, RawBiclusterFile};
pub use classify::{classify, RowClasses};
pub use normalize::min_max_scale;
pub use pipeline::{Reconciler, ReconcilerBuilder, RunOutcome, RunStats};
pub use reconcile::{
    PolicyError, ReconcileConfig, ReconcileError, ResolutionError, UngroupedPolicy,
};
pub use report::{describe_biclusters, ClassificationStats, ColumnSummary};
pub use table::{Cell, ColumnType, Table};

/// Run the full reconciliation pipeline over an in-memory dataset and
/// bicluster collection.
///
/// Convenience wrapper around [`Reconciler`]; use the builder when phase
/// results or an injected generator are needed.
pub fn reconcile(
    table: Table,
    set: BiclusterSet,
    config: ReconcileConfig,
) -> Result<RunOutcome, ReconcileError> {
    Reconciler::new(config).run(table, set)
}
