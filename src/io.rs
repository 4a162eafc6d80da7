//! File boundary: loading the bicluster specification and the dataset,
//! and writing the three run outputs.
//!
//! The dataset comes in as a TSV whose first column is an identifier and
//! is dropped before processing. Column types are decided here, once: a
//! column is numeric iff every non-empty cell parses as a float, and
//! empty cells of numeric columns become `NaN`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::biclusters::{BiclusterSet, RawBiclusterFile};
use crate::reconcile::ReconcileError;
use crate::report::column_type_map;
use crate::table::{Cell, ColumnType, Table};

/// Load and validate the bicluster specification JSON.
pub fn load_bicluster_set(path: &Path) -> Result<BiclusterSet, ReconcileError> {
    let file = File::open(path)?;
    let raw: RawBiclusterFile = serde_json::from_reader(BufReader::new(file))?;
    let set = BiclusterSet::from_raw(raw)?;
    info!(
        "Loaded {} biclusters over {} declared rows from {}",
        set.len(),
        set.total_rows(),
        path.display()
    );
    Ok(set)
}

/// Load the TSV dataset, dropping the leading identifier column and
/// inferring column types.
pub fn load_table(path: &Path) -> Result<Table, ReconcileError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .skip(1)
        .map(|h| h.to_string())
        .collect();
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().skip(1).map(|s| s.to_string()).collect());
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|col| {
            let numeric = raw_rows.iter().all(|row| {
                let cell = row[col].trim();
                cell.is_empty() || cell.parse::<f64>().is_ok()
            });
            if numeric {
                ColumnType::Numeric
            } else {
                ColumnType::Categorical
            }
        })
        .collect();

    let rows: Vec<Vec<Cell>> = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, text)| match types[col] {
                    ColumnType::Numeric => {
                        let trimmed = text.trim();
                        if trimmed.is_empty() {
                            Cell::Number(f64::NAN)
                        } else {
                            Cell::Number(trimmed.parse().unwrap_or(f64::NAN))
                        }
                    }
                    ColumnType::Categorical => Cell::Text(text),
                })
                .collect()
        })
        .collect();

    let numeric_cols = types.iter().filter(|t| **t == ColumnType::Numeric).count();
    let table = Table::new(headers, types, rows).ok_or_else(|| {
        ReconcileError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "dataset rows have inconsistent widths",
        ))
    })?;
    info!(
        "Loaded dataset {}: {} rows x {} columns ({} numeric)",
        path.display(),
        table.n_rows(),
        table.n_cols(),
        numeric_cols
    );
    Ok(table)
}

/// The three output files, derived from the dataset path by replacing
/// its extension with a suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub translated: PathBuf,
    pub data: PathBuf,
    pub types: PathBuf,
}

pub fn output_paths(data_path: &Path) -> OutputPaths {
    let stem = data_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let parent = data_path.parent().unwrap_or_else(|| Path::new(""));
    OutputPaths {
        translated: parent.join(format!("{}-translated.csv", stem)),
        data: parent.join(format!("{}-data.csv", stem)),
        types: parent.join(format!("{}-types.json", stem)),
    }
}

/// Write the canonical bicluster description, verbatim.
pub fn write_description(path: &Path, description: &str) -> Result<(), ReconcileError> {
    let mut file = File::create(path)?;
    file.write_all(description.as_bytes())?;
    Ok(())
}

/// Write the dataset as comma-separated values with a header row. `NaN`
/// cells come out as empty fields.
pub fn write_table(path: &Path, table: &Table) -> Result<(), ReconcileError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.headers())?;
    for row in table.iter_rows() {
        writer.write_record(row.iter().map(|cell| cell.render()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the column name to declared type map as pretty-printed JSON.
pub fn write_column_types(path: &Path, table: &Table) -> Result<(), ReconcileError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &column_type_map(table))?;
    writer.flush()?;
    Ok(())
}
