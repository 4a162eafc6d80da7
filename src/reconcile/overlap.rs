//! Overlap resolution: give every multiply-assigned row a single owner.
//!
//! A row with membership count `k > 1` is split into `k` physically
//! distinct rows, one per owning bicluster. For each owner except the
//! last, a donor row exclusively owned by that bicluster supplies the
//! baseline values of a fresh target row, the contended row's values in
//! the bicluster's columns are moved onto the target, and the bicluster's
//! row list swaps the contended row for the target. The contended row
//! itself stays with the last owner in iteration order.
//!
//! Candidate pools (donors, ungrouped targets, fallback targets) are
//! recomputed from the live membership ledger at every step; selection
//! within a pool is uniform over the injected generator.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::biclusters::BiclusterSet;
use crate::table::Table;

use super::types::{OverlapStats, ResolutionError};

/// Resolve every overlapped row in ascending row order.
///
/// Mutates the table and the bicluster row lists in place. On error the
/// rows processed so far remain fully resolved and consistent; the
/// failing row is untouched.
pub fn resolve_overlaps<R: Rng + ?Sized>(
    table: &mut Table,
    set: &mut BiclusterSet,
    rng: &mut R,
) -> Result<OverlapStats, ResolutionError> {
    let mut counts = set.membership_counts();
    let mut stats = OverlapStats::default();

    for row in 0..counts.len() {
        if counts[row] <= 1 {
            continue;
        }
        let owners = set.owners_of(row);
        for i in 0..owners.len() - 1 {
            let owner = owners[i];
            let donor = exclusive_row_of(set, owner, &counts, rng).ok_or_else(|| {
                ResolutionError::NoDonor {
                    bicluster: set[owner].name().to_string(),
                    row,
                }
            })?;

            let ungrouped: Vec<usize> = counts
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == 0)
                .map(|(r, _)| r)
                .collect();
            let target = match ungrouped.choose(rng) {
                Some(&t) => t,
                None => {
                    let next = owners[i + 1];
                    let fallback = exclusive_row_of(set, next, &counts, rng).ok_or_else(
                        || ResolutionError::NoTarget {
                            row,
                            next_bicluster: set[next].name().to_string(),
                        },
                    )?;
                    stats.fallback_targets += 1;
                    fallback
                }
            };

            // The target keeps the donor's values everywhere except the
            // owner's columns, which carry the contended row's values;
            // the contended row takes the target's pre-copy values there.
            let snapshot = table.clone_row(target);
            table.copy_row(donor, target);
            let cols = set[owner].cols().to_vec();
            table.copy_cells_in_columns(row, target, &cols);
            table.write_cells_in_columns(row, &cols, &snapshot);

            counts[target] = 1;
            set[owner].replace_row(row, target);
            stats.splits += 1;
            debug!(
                "row {} split out of bicluster '{}': donor {}, target {}",
                row,
                set[owner].name(),
                donor,
                target
            );
        }
        counts[row] = 1;
        stats.resolved_rows += 1;
    }
    Ok(stats)
}

/// Uniformly pick a row of `set[owner]` whose membership count is exactly 1.
fn exclusive_row_of<R: Rng + ?Sized>(
    set: &BiclusterSet,
    owner: usize,
    counts: &[usize],
    rng: &mut R,
) -> Option<usize> {
    let pool: Vec<usize> = set[owner]
        .rows()
        .iter()
        .copied()
        .filter(|&r| counts[r] == 1)
        .collect();
    pool.choose(rng).copied()
}
