//! Loading time series from single-column CSV files.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to read a numeric series from a CSV source.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// The path does not carry a `.csv` extension.
    #[error("not a csv file: \"{0}\"")]
    NotCsv(PathBuf),

    /// The file could not be opened or parsed as CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A row holds more (or fewer) than one column.
    #[error("row {row}: expected a single column, found {found}")]
    NotSingleColumn {
        /// 1-based data row index.
        row: usize,
        /// Number of fields found.
        found: usize,
    },

    /// A cell could not be parsed as a finite number.
    #[error("row {row}: {value:?} is not a finite number")]
    NotNumeric {
        /// 1-based data row index.
        row: usize,
        /// Offending cell content.
        value: String,
    },
}

/// Reads a single-column numeric CSV file (with a header row).
///
/// # Errors
///
/// Returns a `SeriesError` if the path is not a `.csv` file, cannot be read,
/// or does not hold exactly one numeric column.
pub fn load_csv_series(path: &Path) -> Result<Vec<f32>, SeriesError> {
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(SeriesError::NotCsv(path.to_path_buf()));
    }
    let file = fs::File::open(path).map_err(csv::Error::from)?;
    read_csv_series(file)
}

/// Reads a single-column numeric CSV table (with a header row) from any reader.
///
/// # Errors
///
/// Returns a `SeriesError` if a row is malformed or not numeric.
pub fn read_csv_series(reader: impl Read) -> Result<Vec<f32>, SeriesError> {
    let rdr = csv::ReaderBuilder::new().from_reader(reader);
    collect_series(rdr)
}

fn collect_series<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<f32>, SeriesError> {
    let headers = rdr.headers()?;
    if headers.len() != 1 {
        return Err(SeriesError::NotSingleColumn {
            row: 0,
            found: headers.len(),
        });
    }

    let mut values = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        if record.len() != 1 {
            return Err(SeriesError::NotSingleColumn {
                row,
                found: record.len(),
            });
        }
        let cell = record[0].trim();
        let value = cell
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SeriesError::NotNumeric {
                row,
                value: cell.to_string(),
            })?;
        values.push(value);
    }
    Ok(values)
}

/// Lists the CSV files available under each sub-directory of `data_folder`.
///
/// Returns a map from sub-directory name (e.g. `"pv"`, `"load"`) to the
/// sorted CSV paths it contains. Files directly under `data_folder` are
/// ignored.
///
/// # Errors
///
/// Returns an `io::Error` if a directory cannot be listed.
pub fn index_data_folder(data_folder: &Path) -> std::io::Result<BTreeMap<String, Vec<PathBuf>>> {
    let mut indexes = BTreeMap::new();
    for entry in fs::read_dir(data_folder)? {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
            .collect();
        files.sort();
        indexes.insert(name, files);
    }
    Ok(indexes)
}
