//! End-to-end reconciliation pipeline.
//!
//! `Reconciler` owns the control flow: bind the specification to the
//! dataset, classify, resolve overlaps, apply the ungrouped policy,
//! re-classify, normalize, and project the report. Each phase is timed
//! and logged; the caller gets the final state plus run statistics.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::biclusters::{BiclusterSet, MalformedSpecError};
use crate::classify::classify;
use crate::normalize::min_max_scale;
use crate::reconcile::{
    resolve_overlaps, resolve_ungrouped, OverlapStats, ReconcileConfig, ReconcileError,
    UngroupedPolicy, UngroupedStats,
};
use crate::report::{
    describe_biclusters, numeric_summaries, ClassificationStats, ColumnSummary,
};
use crate::table::Table;

/// Wall-clock duration of each pipeline phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTimings {
    pub classify: Duration,
    pub overlap: Duration,
    pub ungrouped: Duration,
    pub normalize: Duration,
    pub report: Duration,
}

/// Statistics of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Classification before any mutation.
    pub before: ClassificationStats,
    /// Classification after both resolvers.
    pub after: ClassificationStats,
    pub overlap: OverlapStats,
    pub ungrouped: UngroupedStats,
    pub timings: PhaseTimings,
    pub total_time: Duration,
}

impl RunStats {
    pub fn summary(&self) -> String {
        format!(
            "resolved {} overlapped rows ({} splits, {} fallback targets); policy '{}' affected {} rows; {} -> {} rows",
            self.overlap.resolved_rows,
            self.overlap.splits,
            self.overlap.fallback_targets,
            self.ungrouped.policy,
            self.ungrouped.affected_rows,
            self.before.total_rows,
            self.after.total_rows
        )
    }
}

/// Everything a run produces: the normalized dataset, the final bicluster
/// collection, its canonical description, per-column summaries and the
/// run statistics.
#[derive(Debug)]
pub struct RunOutcome {
    pub table: Table,
    pub biclusters: BiclusterSet,
    pub description: String,
    pub column_summaries: Vec<ColumnSummary>,
    pub stats: RunStats,
}

/// Pipeline driver. Build one with `Reconciler::builder()` or from a
/// ready `ReconcileConfig`.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Reconciler {
        Reconciler { config }
    }

    pub fn builder() -> ReconcilerBuilder {
        ReconcilerBuilder::default()
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run the full pipeline, drawing randomness from the configured
    /// seed, or from OS entropy when none is set.
    pub fn run(&self, table: Table, set: BiclusterSet) -> Result<RunOutcome, ReconcileError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run_with_rng(table, set, &mut rng)
    }

    /// Run the full pipeline against an injected generator.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        mut table: Table,
        mut set: BiclusterSet,
        rng: &mut R,
    ) -> Result<RunOutcome, ReconcileError> {
        let start_time = Instant::now();
        info!(
            "Starting reconciliation pipeline: policy '{}', {} biclusters, {} rows x {} columns",
            self.config.policy,
            set.len(),
            table.n_rows(),
            table.n_cols()
        );

        // Bind the specification to the dataset before any mutation
        if set.total_rows() != table.n_rows() {
            return Err(MalformedSpecError::RowCountMismatch {
                declared: set.total_rows(),
                actual: table.n_rows(),
            }
            .into());
        }
        set.check_columns(table.n_cols())?;

        let mut timings = PhaseTimings::default();

        // Step 1: initial classification
        let phase_start = Instant::now();
        let before = ClassificationStats::from_classes(&classify(&set));
        timings.classify = phase_start.elapsed();
        info!("Initial classification: {}", before);

        // Step 2: overlap resolution
        let phase_start = Instant::now();
        let overlap = resolve_overlaps(&mut table, &mut set, rng)?;
        timings.overlap = phase_start.elapsed();
        info!(
            "Overlap resolution completed in {:?}: {} rows resolved, {} splits, {} fallback targets",
            timings.overlap, overlap.resolved_rows, overlap.splits, overlap.fallback_targets
        );

        // Step 3: ungrouped policy
        let phase_start = Instant::now();
        let ungrouped = resolve_ungrouped(&mut table, &mut set, self.config.policy, rng);
        timings.ungrouped = phase_start.elapsed();
        info!(
            "Ungrouped resolution completed in {:?}: policy '{}' affected {} rows",
            timings.ungrouped, ungrouped.policy, ungrouped.affected_rows
        );

        let after = ClassificationStats::from_classes(&classify(&set));
        info!("Final classification: {}", after);

        // Step 4: normalization
        let phase_start = Instant::now();
        min_max_scale(&mut table);
        timings.normalize = phase_start.elapsed();
        info!("Normalization completed in {:?}", timings.normalize);

        // Step 5: report projections
        let phase_start = Instant::now();
        let description = describe_biclusters(&set);
        let column_summaries = numeric_summaries(&table);
        timings.report = phase_start.elapsed();
        for summary in &column_summaries {
            debug!("Column {}", summary);
        }

        let total_time = start_time.elapsed();
        let stats = RunStats {
            before,
            after,
            overlap,
            ungrouped,
            timings,
            total_time,
        };
        info!("Pipeline completed in {:?}: {}", total_time, stats.summary());

        Ok(RunOutcome {
            table,
            biclusters: set,
            description,
            column_summaries,
            stats,
        })
    }
}

/// Builder mirroring the fields of `ReconcileConfig`.
#[derive(Debug, Clone, Default)]
pub struct ReconcilerBuilder {
    config: ReconcileConfig,
}

impl ReconcilerBuilder {
    pub fn with_policy(mut self, policy: UngroupedPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Reconciler {
        Reconciler::new(self.config)
    }
}
