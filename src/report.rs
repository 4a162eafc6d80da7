//! Pure projections of the final pipeline state: the canonical bicluster
//! description, classification statistics, the column type map and
//! per-column numeric summaries. Nothing here mutates anything.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use statrs::statistics::Statistics;

use crate::biclusters::BiclusterSet;
use crate::classify::RowClasses;
use crate::table::Table;

/// Render the canonical description of the final bicluster collection.
///
/// Biclusters are ordered by their minimum row index; inside each entry
/// rows and columns are sorted ascending. Entries are numbered by their
/// position in that ordering, not by name.
pub fn describe_biclusters(set: &BiclusterSet) -> String {
    let mut sorted: Vec<(Vec<usize>, Vec<usize>)> = set
        .iter()
        .map(|b| {
            let mut rows = b.rows().to_vec();
            rows.sort_unstable();
            let mut cols = b.cols().to_vec();
            cols.sort_unstable();
            (rows, cols)
        })
        .collect();
    sorted.sort_by_key(|(rows, _)| rows.first().copied().unwrap_or(usize::MAX));
    sorted
        .iter()
        .enumerate()
        .map(|(i, (rows, cols))| {
            format!(
                "Bicluster{}: (rows: [{}] cols: [{}])",
                i,
                join_indices(rows),
                join_indices(cols)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Grouped/ungrouped/overlapped counts of a classification, with the
/// percentage rendering used on the run's output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationStats {
    pub total_rows: usize,
    pub grouped: usize,
    pub ungrouped: usize,
    pub overlapped: usize,
}

impl ClassificationStats {
    pub fn from_classes(classes: &RowClasses) -> ClassificationStats {
        ClassificationStats {
            total_rows: classes.total_rows(),
            grouped: classes.grouped.len(),
            ungrouped: classes.ungrouped.len(),
            overlapped: classes.overlapped.len(),
        }
    }

    pub fn grouped_pct(&self) -> f64 {
        self.grouped as f64 / self.total_rows as f64 * 100.0
    }

    pub fn ungrouped_pct(&self) -> f64 {
        self.ungrouped as f64 / self.total_rows as f64 * 100.0
    }

    pub fn overlapped_pct(&self) -> f64 {
        self.overlapped as f64 / self.total_rows as f64 * 100.0
    }
}

impl fmt::Display for ClassificationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grouped: {:.2}%, Ungrouped: {:.2}%, Overlapped: {:.2}%",
            self.grouped_pct(),
            self.ungrouped_pct(),
            self.overlapped_pct()
        )
    }
}

/// Column name to declared type, in column order.
pub fn column_type_map(table: &Table) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, ty) in table.headers().iter().zip(table.column_types()) {
        map.insert(name.clone(), Value::String(ty.dtype_name().to_string()));
    }
    map
}

/// Spread of one numeric column over its finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: min {:.4}, max {:.4}, mean {:.4}, std dev {:.4}",
            self.name, self.min, self.max, self.mean, self.std_dev
        )
    }
}

/// Summaries for every numeric column that has at least one finite value.
pub fn numeric_summaries(table: &Table) -> Vec<ColumnSummary> {
    (0..table.n_cols())
        .filter_map(|col| {
            let values = table.numeric_column(col)?;
            let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
            if finite.is_empty() {
                return None;
            }
            Some(ColumnSummary {
                name: table.headers()[col].clone(),
                min: Statistics::min(finite.iter()),
                max: Statistics::max(finite.iter()),
                mean: finite.iter().mean(),
                std_dev: finite.iter().std_dev(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biclusters::Bicluster;
    use crate::table::{Cell, ColumnType};

    #[test]
    fn test_describe_sorts_by_min_row_and_inside_entries() {
        let set = BiclusterSet::from_parts(
            vec![
                Bicluster::new("late", vec![4, 2], vec![1, 0]),
                Bicluster::new("early", vec![3, 0], vec![2]),
            ],
            5,
        )
        .unwrap();
        assert_eq!(
            describe_biclusters(&set),
            "Bicluster0: (rows: [0 3] cols: [2]), Bicluster1: (rows: [2 4] cols: [0 1])"
        );
    }

    #[test]
    fn test_describe_single_bicluster_has_no_separator() {
        let set = BiclusterSet::from_parts(
            vec![Bicluster::new("only", vec![1, 0], vec![0])],
            2,
        )
        .unwrap();
        assert_eq!(
            describe_biclusters(&set),
            "Bicluster0: (rows: [0 1] cols: [0])"
        );
    }

    #[test]
    fn test_stats_display_renders_percentages() {
        let classes = RowClasses::from_counts(vec![1, 1, 1, 0, 2]);
        let stats = ClassificationStats::from_classes(&classes);
        assert_eq!(stats.grouped, 3);
        assert_eq!(stats.ungrouped, 1);
        assert_eq!(stats.overlapped, 1);
        assert_eq!(
            stats.to_string(),
            "Grouped: 60.00%, Ungrouped: 20.00%, Overlapped: 20.00%"
        );
    }

    #[test]
    fn test_column_type_map_keeps_column_order() {
        let table = Table::new(
            vec!["gene".into(), "expr".into()],
            vec![ColumnType::Categorical, ColumnType::Numeric],
            vec![vec![Cell::Text("g1".into()), Cell::Number(0.5)]],
        )
        .unwrap();
        let map = column_type_map(&table);
        let rendered = serde_json::to_string(&map).unwrap();
        assert_eq!(rendered, r#"{"gene":"object","expr":"float64"}"#);
    }

    #[test]
    fn test_numeric_summaries_skip_categorical_and_nan() {
        let table = Table::new(
            vec!["v".into(), "label".into()],
            vec![ColumnType::Numeric, ColumnType::Categorical],
            vec![
                vec![Cell::Number(1.0), Cell::Text("a".into())],
                vec![Cell::Number(f64::NAN), Cell::Text("b".into())],
                vec![Cell::Number(3.0), Cell::Text("c".into())],
            ],
        )
        .unwrap();
        let summaries = numeric_summaries(&table);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.name, "v");
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        assert_eq!(s.mean, 2.0);
        assert!((s.std_dev - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
