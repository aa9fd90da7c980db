use crate::error::Result;
use std::path::Path;

/// A small in-memory table with a dynamic column set.
///
/// Category files written by the collector share one schema, but the merger
/// accepts any CSV: concatenation takes the union of columns in first-seen
/// order, and cells absent from a source file stay empty. An empty cell is
/// what "missing" means throughout the statistics.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            // Short records pad out to the header width
            cells.resize(columns.len(), String::new());
            rows.push(cells);
        }

        Ok(Self { columns, rows })
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Stamp every row with the same value, appending the column if new
    pub fn set_constant_column(&mut self, name: &str, value: &str) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }

    /// Append a fully materialized column; `values` must match the row count
    pub fn add_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Concatenate another table below this one, taking the union of columns
    pub fn append(&mut self, other: Table) {
        let mut indices = Vec::with_capacity(other.columns.len());
        for name in &other.columns {
            let idx = match self.column_index(name) {
                Some(idx) => idx,
                None => {
                    self.columns.push(name.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.columns.len() - 1
                }
            };
            indices.push(idx);
        }

        let width = self.columns.len();
        for cells in other.rows {
            let mut row = vec![String::new(); width];
            for (value, &idx) in cells.into_iter().zip(&indices) {
                row[idx] = value;
            }
            self.rows.push(row);
        }
    }

    /// Per-column count of missing (empty) cells, restricted to columns with
    /// at least one
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let count = self.rows.iter().filter(|row| row[idx].is_empty()).count();
                (name.clone(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}
