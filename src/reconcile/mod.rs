//! The two reconciliation resolvers and their shared types.
//!
//! Overlap resolution runs first and gives every multiply-assigned row a
//! single owner; ungrouped resolution then applies the run's policy to
//! the rows no bicluster claims. Both mutate the dataset and the
//! bicluster row lists in place and draw donor/target choices from an
//! injected generator.

pub mod overlap;
pub mod types;
pub mod ungrouped;

pub use overlap::resolve_overlaps;
pub use types::{
    OverlapStats, PolicyError, ReconcileConfig, ReconcileError, ResolutionError, UngroupedPolicy,
    UngroupedStats,
};
pub use ungrouped::resolve_ungrouped;
