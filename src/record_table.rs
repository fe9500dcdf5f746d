use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/* The table contract is deliberately hybrid: columns 0 and 1 are positional
(day key and remote record id, whatever their header says) while the
geometry column is resolved by header name. This mirrors the spreadsheet
this tool is used against. */
pub const DAY_COLUMN: usize = 0;
pub const RECORD_ID_COLUMN: usize = 1;
pub const GEOMETRY_COLUMN_NAME: &str = "geometry";

#[derive(Debug, PartialEq)]
pub struct RecordTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    geometry_idx: usize,
}

impl RecordTable {
    pub fn load(path: &Path) -> Result<RecordTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open table '{}'", path.display()))?;
        let header: Vec<String> = reader.headers()?.iter().map(|cell| cell.to_string()).collect();
        let geometry_idx = header
            .iter()
            .position(|name| name == GEOMETRY_COLUMN_NAME)
            .ok_or_else(|| {
                anyhow!("required column '{GEOMETRY_COLUMN_NAME}' not found in table header")
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(RecordTable {
            header,
            rows,
            geometry_idx,
        })
    }

    /// Maps the exact day-key string (column 0) to (row index, record id).
    /// Rows without both positional columns are skipped. Duplicate day keys
    /// shadow each other: the last row wins.
    pub fn day_lookup(&self) -> HashMap<String, (usize, String)> {
        let mut lookup = HashMap::new();
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() > RECORD_ID_COLUMN {
                lookup.insert(row[DAY_COLUMN].clone(), (i, row[RECORD_ID_COLUMN].clone()));
            }
        }
        lookup
    }

    /// Overwrites the geometry cell of one row, leaving the rest of the row
    /// untouched. Rows too short to contain the geometry column are left
    /// alone.
    pub fn set_geometry(&mut self, row_idx: usize, wkt: &str) {
        if let Some(cell) = self
            .rows
            .get_mut(row_idx)
            .and_then(|row| row.get_mut(self.geometry_idx))
        {
            *cell = wkt.to_string();
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Full rewrite: header then every row.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to write table '{}'", path.display()))?;
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
