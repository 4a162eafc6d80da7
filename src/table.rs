//! Owned row store for the dataset being reconciled.
//!
//! Rows are addressed by a dense zero-based index that stays contiguous
//! across removals; all mutation goes through explicit primitives
//! (full-row copy, column-restricted writes, multi-row removal) so that
//! renumbering is visible at the call site instead of hidden behind a
//! positional reindex.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// A single cell: numeric or categorical.
///
/// Numeric columns may hold `NaN` (missing values and zero-range
/// normalization both produce it); categorical cells keep their text
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    /// Rendering used for CSV output. `NaN` renders as an empty field.
    pub fn render(&self) -> String {
        match self {
            Cell::Number(v) if v.is_nan() => String::new(),
            Cell::Number(v) => format!("{}", v),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Declared type of a column, decided once when the table is built.
///
/// The serialized names are the ones the downstream consumer of the
/// reconciled output expects in the types map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    #[serde(rename = "float64")]
    Numeric,
    #[serde(rename = "object")]
    Categorical,
}

impl ColumnType {
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "float64",
            ColumnType::Categorical => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dtype_name())
    }
}

/// Row-major table with named, typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from parts. Returns `None` when the shape is
    /// inconsistent (header/type length mismatch or a ragged row).
    pub fn new(headers: Vec<String>, types: Vec<ColumnType>, rows: Vec<Vec<Cell>>) -> Option<Table> {
        if headers.len() != types.len() {
            return None;
        }
        if rows.iter().any(|r| r.len() != headers.len()) {
            return None;
        }
        Some(Table {
            headers,
            types,
            rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn column_type(&self, col: usize) -> ColumnType {
        self.types[col]
    }

    pub fn is_numeric(&self, col: usize) -> bool {
        self.types[col] == ColumnType::Numeric
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.rows[row]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Snapshot of a row's cells, for use before the row is overwritten.
    pub fn clone_row(&self, row: usize) -> Vec<Cell> {
        self.rows[row].clone()
    }

    /// Full-row copy: every cell of `dst` takes `src`'s value.
    pub fn copy_row(&mut self, src: usize, dst: usize) {
        if src == dst {
            return;
        }
        let copied = self.rows[src].clone();
        self.rows[dst] = copied;
    }

    /// For each listed column, `dst`'s cell takes `src`'s current value.
    pub fn copy_cells_in_columns(&mut self, src: usize, dst: usize, cols: &[usize]) {
        if src == dst {
            return;
        }
        for &c in cols {
            let v = self.rows[src][c].clone();
            self.rows[dst][c] = v;
        }
    }

    /// For each listed column, `dst`'s cell takes the value the snapshot
    /// holds for that column. The snapshot must span the full row width.
    pub fn write_cells_in_columns(&mut self, dst: usize, cols: &[usize], snapshot: &[Cell]) {
        for &c in cols {
            self.rows[dst][c] = snapshot[c].clone();
        }
    }

    /// Numeric values of a column, in row order. `None` for categorical
    /// columns.
    pub fn numeric_column(&self, col: usize) -> Option<Vec<f64>> {
        if !self.is_numeric(col) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|r| r[col].as_number().unwrap_or(f64::NAN))
                .collect(),
        )
    }

    /// Delete the listed rows (indices must be sorted ascending and
    /// unique). Surviving rows keep their relative order; the caller is
    /// responsible for renumbering any external index that pointed past
    /// a removed row.
    pub fn remove_rows(&mut self, sorted: &[usize]) {
        if sorted.is_empty() {
            return;
        }
        let mut doomed = sorted.iter().copied().peekable();
        let mut idx = 0usize;
        self.rows.retain(|_| {
            let drop = doomed.peek() == Some(&idx);
            if drop {
                doomed.next();
            }
            idx += 1;
            !drop
        });
    }
}

impl Index<(usize, usize)> for Table {
    type Output = Cell;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        &self.rows[row][col]
    }
}

impl IndexMut<(usize, usize)> for Table {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, col) = index;
        &mut self.rows[row][col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Cell {
        Cell::Number(v)
    }

    fn txt(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample() -> Table {
        Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                ColumnType::Numeric,
                ColumnType::Numeric,
                ColumnType::Categorical,
            ],
            vec![
                vec![num(1.0), num(2.0), txt("x")],
                vec![num(3.0), num(4.0), txt("y")],
                vec![num(5.0), num(6.0), txt("z")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![ColumnType::Numeric, ColumnType::Numeric],
            vec![vec![num(1.0)]],
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_new_rejects_header_type_mismatch() {
        let t = Table::new(vec!["a".into()], vec![], vec![]);
        assert!(t.is_none());
    }

    #[test]
    fn test_cell_access() {
        let t = sample();
        assert_eq!(t.cell(0, 0), Some(&num(1.0)));
        assert_eq!(t.cell(2, 2), Some(&txt("z")));
        assert_eq!(t.cell(3, 0), None);
        assert_eq!(t.cell(0, 3), None);
        assert_eq!(t[(1, 1)], num(4.0));
    }

    #[test]
    fn test_index_mut() {
        let mut t = sample();
        t[(0, 0)] = num(9.0);
        assert_eq!(t[(0, 0)], num(9.0));
    }

    #[test]
    fn test_copy_row() {
        let mut t = sample();
        t.copy_row(0, 2);
        assert_eq!(t.row(2), &[num(1.0), num(2.0), txt("x")]);
        // source untouched
        assert_eq!(t.row(0), &[num(1.0), num(2.0), txt("x")]);
    }

    #[test]
    fn test_copy_cells_in_columns() {
        let mut t = sample();
        t.copy_cells_in_columns(0, 1, &[0, 2]);
        assert_eq!(t.row(1), &[num(1.0), num(4.0), txt("x")]);
    }

    #[test]
    fn test_write_cells_in_columns_uses_snapshot_not_live_values() {
        let mut t = sample();
        let snapshot = t.clone_row(1);
        t.copy_row(0, 1);
        t.write_cells_in_columns(1, &[1], &snapshot);
        assert_eq!(t.row(1), &[num(1.0), num(4.0), txt("x")]);
    }

    #[test]
    fn test_remove_rows_keeps_order() {
        let mut t = sample();
        t.remove_rows(&[1]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.row(0), &[num(1.0), num(2.0), txt("x")]);
        assert_eq!(t.row(1), &[num(5.0), num(6.0), txt("z")]);
    }

    #[test]
    fn test_remove_rows_multiple() {
        let mut t = sample();
        t.remove_rows(&[0, 2]);
        assert_eq!(t.n_rows(), 1);
        assert_eq!(t.row(0), &[num(3.0), num(4.0), txt("y")]);
    }

    #[test]
    fn test_numeric_column() {
        let t = sample();
        assert_eq!(t.numeric_column(1), Some(vec![2.0, 4.0, 6.0]));
        assert_eq!(t.numeric_column(2), None);
    }

    #[test]
    fn test_nan_renders_empty() {
        assert_eq!(num(f64::NAN).render(), "");
        assert_eq!(num(0.25).render(), "0.25");
        assert_eq!(txt("ok").render(), "ok");
    }
}
