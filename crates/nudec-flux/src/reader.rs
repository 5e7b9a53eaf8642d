//! Whitespace-delimited numeric flux tables.
//!
//! One row per line, columns separated by any whitespace. Blank lines and
//! lines starting with `#` are skipped. The first data row fixes the column
//! count; every later row must match it. No other schema is imposed.

use std::fs;
use std::path::Path;

use nudec_core::error::FluxError;
use tracing::debug;

/// In-memory numeric table, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxTable {
    columns: usize,
    data: Vec<f64>,
}

impl FluxTable {
    pub fn rows(&self) -> usize {
        if self.columns == 0 { 0 } else { self.data.len() / self.columns }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.columns)?;
        self.data.get(start..start + self.columns)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.columns {
            return None;
        }
        self.row(row).map(|r| r[col])
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.data
            .chunks(self.columns.max(1))
            .filter_map(move |r| r.get(col).copied())
    }
}

/// Parse a table from text.
pub fn parse_flux_table(text: &str) -> Result<FluxTable, FluxError> {
    let mut columns = 0;
    let mut data = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let before = data.len();
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| FluxError::Parse {
                line: line_no,
                token: token.to_string(),
            })?;
            data.push(value);
        }
        let got = data.len() - before;

        if columns == 0 {
            columns = got;
        } else if got != columns {
            return Err(FluxError::RaggedRow {
                line: line_no,
                expected: columns,
                got,
            });
        }
    }

    if data.is_empty() {
        return Err(FluxError::Empty);
    }
    Ok(FluxTable { columns, data })
}

/// Read and parse a table from disk.
pub fn read_flux_table(path: &Path) -> Result<FluxTable, FluxError> {
    let text = fs::read_to_string(path).map_err(|e| FluxError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let table = parse_flux_table(&text)?;
    debug!(path = %path.display(), rows = table.rows(), columns = table.columns(), "read flux table");
    Ok(table)
}
