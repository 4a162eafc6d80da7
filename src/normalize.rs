//! Min-max scaling of numeric columns.
//!
//! The scaler is a pure function of the final dataset; it never looks at
//! bicluster state. Columns are transformed independently and in place, so
//! the original column order is untouched.

use crate::table::{Cell, Table};

/// Scale every numeric column of `table` with `(x - min) / (max - min)`.
///
/// `NaN` cells are ignored when computing a column's min and max and come
/// out of the scaling still `NaN`. A zero-range column (`max == min`)
/// produces `NaN` for every cell, as the raw formula dictates; callers
/// must tolerate this rather than expect a clamped value. Categorical
/// columns pass through unchanged.
pub fn min_max_scale(table: &mut Table) {
    for col in 0..table.n_cols() {
        let values = match table.numeric_column(col) {
            Some(v) => v,
            None => continue,
        };
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &values {
            if v.is_nan() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            // every cell is NaN, nothing to scale
            continue;
        }
        let range = max - min;
        for row in 0..table.n_rows() {
            if let Some(Cell::Number(v)) = table.cell_mut(row, col) {
                *v = (*v - min) / range;
            }
        }
    }
}
