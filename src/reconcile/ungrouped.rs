//! Ungrouped-row resolution: apply the run's policy to every row that
//! still belongs to no bicluster after overlap resolution.

use log::debug;
use rand::Rng;

use crate::biclusters::BiclusterSet;
use crate::table::Table;

use super::types::{UngroupedPolicy, UngroupedStats};

/// Apply `policy` to the rows currently classified as ungrouped.
///
/// `replace` overwrites each ungrouped row with a copy of a uniformly
/// chosen row of a uniformly chosen bicluster and appends the row to that
/// bicluster. `remove` deletes the rows and renumbers every surviving
/// index (table and bicluster row lists) so indices stay dense. `nothing`
/// leaves everything untouched.
pub fn resolve_ungrouped<R: Rng + ?Sized>(
    table: &mut Table,
    set: &mut BiclusterSet,
    policy: UngroupedPolicy,
    rng: &mut R,
) -> UngroupedStats {
    let ungrouped: Vec<usize> = set
        .membership_counts()
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == 0)
        .map(|(r, _)| r)
        .collect();

    match policy {
        UngroupedPolicy::Replace => {
            for &row in &ungrouped {
                let owner = rng.random_range(0..set.len());
                let rows = set[owner].rows();
                let source = rows[rng.random_range(0..rows.len())];
                table.copy_row(source, row);
                set[owner].push_row(row);
                debug!(
                    "ungrouped row {} replaced with a copy of row {} from bicluster '{}'",
                    row,
                    source,
                    set[owner].name()
                );
            }
            UngroupedStats {
                policy,
                affected_rows: ungrouped.len(),
            }
        }
        UngroupedPolicy::Remove => {
            table.remove_rows(&ungrouped);
            for b in set.iter_mut() {
                // shift each surviving index down by the number of
                // removed rows below it
                b.map_rows(|r| r - ungrouped.partition_point(|&x| x < r));
            }
            let new_total = set.total_rows() - ungrouped.len();
            set.set_total_rows(new_total);
            debug!("removed {} ungrouped rows, {} remain", ungrouped.len(), new_total);
            UngroupedStats {
                policy,
                affected_rows: ungrouped.len(),
            }
        }
        UngroupedPolicy::Nothing => UngroupedStats {
            policy,
            affected_rows: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biclusters::Bicluster;
    use crate::table::{Cell, ColumnType, Table};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn num(v: f64) -> Cell {
        Cell::Number(v)
    }

    fn coded_table(n_rows: usize) -> Table {
        Table::new(
            vec!["c0".into(), "c1".into()],
            vec![ColumnType::Numeric; 2],
            (0..n_rows)
                .map(|r| vec![num(r as f64), num((r * 10) as f64)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_replace_leaves_no_row_ungrouped() {
        let mut table = coded_table(5);
        let mut set = BiclusterSet::from_parts(
            vec![
                Bicluster::new("a", vec![0, 1], vec![0]),
                Bicluster::new("b", vec![3], vec![1]),
            ],
            5,
        )
        .unwrap();
        let stats = resolve_ungrouped(&mut table, &mut set, UngroupedPolicy::Replace, &mut rng());

        assert_eq!(stats.affected_rows, 2);
        assert_eq!(table.n_rows(), 5);
        assert_eq!(set.total_rows(), 5);
        assert!(set.membership_counts().iter().all(|&c| c == 1));
    }

    #[test]
    fn test_replace_copies_a_row_of_the_appending_bicluster() {
        let mut table = coded_table(4);
        let original = table.clone();
        let mut set = BiclusterSet::from_parts(
            vec![
                Bicluster::new("a", vec![0], vec![0]),
                Bicluster::new("b", vec![1, 2], vec![1]),
            ],
            4,
        )
        .unwrap();
        resolve_ungrouped(&mut table, &mut set, UngroupedPolicy::Replace, &mut rng());

        // row 3 was appended to exactly one bicluster and now carries a
        // copy of one of that bicluster's pre-existing rows
        let owners = set.owners_of(3);
        assert_eq!(owners.len(), 1);
        let donors: Vec<usize> = match owners[0] {
            0 => vec![0],
            _ => vec![1, 2],
        };
        assert!(donors.iter().any(|&d| table.row(3) == original.row(d)));
    }

    #[test]
    fn test_remove_renumbers_table_and_row_lists() {
        let mut table = coded_table(6);
        let mut set = BiclusterSet::from_parts(
            vec![
                Bicluster::new("a", vec![0, 2], vec![0]),
                Bicluster::new("b", vec![5], vec![1]),
            ],
            6,
        )
        .unwrap();
        let stats = resolve_ungrouped(&mut table, &mut set, UngroupedPolicy::Remove, &mut rng());

        assert_eq!(stats.affected_rows, 3);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(set.total_rows(), 3);
        assert_eq!(set[0].rows(), &[0, 1]);
        assert_eq!(set[1].rows(), &[2]);
        // surviving rows keep their contents and order
        assert_eq!(table.row(0), &[num(0.0), num(0.0)]);
        assert_eq!(table.row(1), &[num(2.0), num(20.0)]);
        assert_eq!(table.row(2), &[num(5.0), num(50.0)]);
        assert!(set.membership_counts().iter().all(|&c| c == 1));
    }

    #[test]
    fn test_remove_with_no_ungrouped_rows_is_a_no_op() {
        let mut table = coded_table(2);
        let original = table.clone();
        let mut set = BiclusterSet::from_parts(
            vec![Bicluster::new("a", vec![0, 1], vec![0])],
            2,
        )
        .unwrap();
        let before = set.clone();
        let stats = resolve_ungrouped(&mut table, &mut set, UngroupedPolicy::Remove, &mut rng());
        assert_eq!(stats.affected_rows, 0);
        assert_eq!(table, original);
        assert_eq!(set, before);
    }

    #[test]
    fn test_nothing_mutates_nothing() {
        let mut table = coded_table(4);
        let original = table.clone();
        let mut set = BiclusterSet::from_parts(
            vec![Bicluster::new("a", vec![1], vec![0])],
            4,
        )
        .unwrap();
        let before = set.clone();
        let stats = resolve_ungrouped(&mut table, &mut set, UngroupedPolicy::Nothing, &mut rng());

        assert_eq!(stats.affected_rows, 0);
        assert_eq!(table, original);
        assert_eq!(set, before);
        assert_eq!(set.membership_counts(), vec![0, 1, 0, 0]);
    }
}
