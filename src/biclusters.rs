//! Bicluster collection: named row-subset x column-subset groups over the
//! dataset, plus the declared total row count.
//!
//! The collection is validated once at load time and then mutated in place
//! by the resolvers. Iteration order is the order the biclusters appeared
//! in the input file; nothing here re-sorts it.

use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::Deserialize;
use serde_json::Value;

/// Validation failures for a bicluster specification.
///
/// All variants are fatal and reported before any mutation begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedSpecError {
    NoBiclusters,
    BadRowCount(String),
    MissingField {
        bicluster: String,
        field: &'static str,
    },
    BadIndexList {
        bicluster: String,
        field: &'static str,
    },
    EmptyRows(String),
    EmptyCols(String),
    RowOutOfRange {
        bicluster: String,
        row: usize,
        total: usize,
    },
    ColOutOfRange {
        bicluster: String,
        col: usize,
        n_cols: usize,
    },
    RowCountMismatch {
        declared: usize,
        actual: usize,
    },
}

impl fmt::Display for MalformedSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedSpecError::NoBiclusters => {
                write!(f, "specification contains no biclusters")
            }
            MalformedSpecError::BadRowCount(got) => {
                write!(f, "declared total row count is invalid: {}", got)
            }
            MalformedSpecError::MissingField { bicluster, field } => {
                write!(f, "bicluster '{}' is missing field '{}'", bicluster, field)
            }
            MalformedSpecError::BadIndexList { bicluster, field } => {
                write!(
                    f,
                    "bicluster '{}' field '{}' is not a list of non-negative integers",
                    bicluster, field
                )
            }
            MalformedSpecError::EmptyRows(bicluster) => {
                write!(f, "bicluster '{}' has an empty row set", bicluster)
            }
            MalformedSpecError::EmptyCols(bicluster) => {
                write!(f, "bicluster '{}' has an empty column set", bicluster)
            }
            MalformedSpecError::RowOutOfRange {
                bicluster,
                row,
                total,
            } => {
                write!(
                    f,
                    "bicluster '{}' references row {} but the dataset declares {} rows",
                    bicluster, row, total
                )
            }
            MalformedSpecError::ColOutOfRange {
                bicluster,
                col,
                n_cols,
            } => {
                write!(
                    f,
                    "bicluster '{}' references column {} but the dataset has {} columns",
                    bicluster, col, n_cols
                )
            }
            MalformedSpecError::RowCountMismatch { declared, actual } => {
                write!(
                    f,
                    "specification declares {} rows but the dataset has {}",
                    declared, actual
                )
            }
        }
    }
}

impl Error for MalformedSpecError {}

/// Raw deserialized form of the bicluster file, before validation.
///
/// The map keeps file order (serde_json's `preserve_order` feature), which
/// later fixes the iteration order of the whole run. `#DatasetRows` is left
/// as a raw value because producers emit it either as a number or as a
/// numeric string.
#[derive(Debug, Deserialize)]
pub struct RawBiclusterFile {
    #[serde(default)]
    pub biclusters: serde_json::Map<String, Value>,
    #[serde(rename = "#DatasetRows", default)]
    pub dataset_rows: Option<Value>,
}

/// One named bicluster: a row-index list and a column-index list.
///
/// The row list may grow or shrink during reconciliation; the column list
/// never changes after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bicluster {
    name: String,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl Bicluster {
    pub fn new(name: impl Into<String>, rows: Vec<usize>, cols: Vec<usize>) -> Bicluster {
        Bicluster {
            name: name.into(),
            rows,
            cols,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn min_row(&self) -> Option<usize> {
        self.rows.iter().min().copied()
    }

    /// Swap every occurrence of `old` in the row list for `new`.
    pub fn replace_row(&mut self, old: usize, new: usize) {
        for r in &mut self.rows {
            if *r == old {
                *r = new;
            }
        }
    }

    pub fn push_row(&mut self, row: usize) {
        self.rows.push(row);
    }

    /// Renumber every row index through `f`, preserving list order.
    pub fn map_rows<F: FnMut(usize) -> usize>(&mut self, mut f: F) {
        for r in &mut self.rows {
            *r = f(*r);
        }
    }
}

/// The validated bicluster collection plus the declared dataset row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiclusterSet {
    biclusters: Vec<Bicluster>,
    total_rows: usize,
}

impl BiclusterSet {
    /// Validate a raw deserialized file into a usable set.
    pub fn from_raw(raw: RawBiclusterFile) -> Result<BiclusterSet, MalformedSpecError> {
        let total_rows = parse_row_count(raw.dataset_rows.as_ref())?;
        if raw.biclusters.is_empty() {
            return Err(MalformedSpecError::NoBiclusters);
        }
        let mut biclusters = Vec::with_capacity(raw.biclusters.len());
        for (name, body) in &raw.biclusters {
            let rows = index_list(name, body, "X")?;
            let cols = index_list(name, body, "Y")?;
            biclusters.push(Bicluster::new(name.clone(), rows, cols));
        }
        BiclusterSet::from_parts(biclusters, total_rows)
    }

    /// Build a set from already-typed biclusters, applying the same
    /// validation as `from_raw`.
    pub fn from_parts(
        biclusters: Vec<Bicluster>,
        total_rows: usize,
    ) -> Result<BiclusterSet, MalformedSpecError> {
        if total_rows == 0 {
            return Err(MalformedSpecError::BadRowCount("0".to_string()));
        }
        if biclusters.is_empty() {
            return Err(MalformedSpecError::NoBiclusters);
        }
        for b in &biclusters {
            if b.rows.is_empty() {
                return Err(MalformedSpecError::EmptyRows(b.name.clone()));
            }
            if b.cols.is_empty() {
                return Err(MalformedSpecError::EmptyCols(b.name.clone()));
            }
            for &r in &b.rows {
                if r >= total_rows {
                    return Err(MalformedSpecError::RowOutOfRange {
                        bicluster: b.name.clone(),
                        row: r,
                        total: total_rows,
                    });
                }
            }
        }
        Ok(BiclusterSet {
            biclusters,
            total_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.biclusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biclusters.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Shrink the declared row count after rows were removed.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bicluster> {
        self.biclusters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bicluster> {
        self.biclusters.iter_mut()
    }

    /// Membership count per row index in `[0, total_rows)`.
    ///
    /// Derived by scanning every bicluster's row list; callers cache the
    /// vector and re-derive after any mutation.
    pub fn membership_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.total_rows];
        for b in &self.biclusters {
            for &r in &b.rows {
                counts[r] += 1;
            }
        }
        counts
    }

    /// Indices of the biclusters whose row list contains `row`, in
    /// collection order.
    pub fn owners_of(&self, row: usize) -> Vec<usize> {
        self.biclusters
            .iter()
            .enumerate()
            .filter(|(_, b)| b.contains_row(row))
            .map(|(i, _)| i)
            .collect()
    }

    /// Check every column index against the dataset width. Run before the
    /// resolvers touch any cell.
    pub fn check_columns(&self, n_cols: usize) -> Result<(), MalformedSpecError> {
        for b in &self.biclusters {
            for &c in &b.cols {
                if c >= n_cols {
                    return Err(MalformedSpecError::ColOutOfRange {
                        bicluster: b.name.clone(),
                        col: c,
                        n_cols,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Index<usize> for BiclusterSet {
    type Output = Bicluster;

    fn index(&self, index: usize) -> &Self::Output {
        &self.biclusters[index]
    }
}

impl IndexMut<usize> for BiclusterSet {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.biclusters[index]
    }
}

fn parse_row_count(value: Option<&Value>) -> Result<usize, MalformedSpecError> {
    let value = match value {
        Some(v) => v,
        None => return Err(MalformedSpecError::BadRowCount("missing".to_string())),
    };
    let total = match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match total {
        Some(n) if n > 0 => Ok(n),
        _ => Err(MalformedSpecError::BadRowCount(value.to_string())),
    }
}

fn index_list(
    name: &str,
    body: &Value,
    field: &'static str,
) -> Result<Vec<usize>, MalformedSpecError> {
    let list = body
        .get(field)
        .ok_or_else(|| MalformedSpecError::MissingField {
            bicluster: name.to_string(),
            field,
        })?;
    let list = list
        .as_array()
        .ok_or_else(|| MalformedSpecError::BadIndexList {
            bicluster: name.to_string(),
            field,
        })?;
    list.iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| MalformedSpecError::BadIndexList {
                    bicluster: name.to_string(),
                    field,
                })
        })
        .collect()
}
