//! # Dataset Provider Module
//!
//! The pipeline does not care where its tables come from. A [`DatasetProvider`]
//! hands back the rows of one table, already past its junk rows, as
//! [`RawRow`]s keyed by the configured field names.

use crate::planner_config::DatasetConfig;
use crate::planner_errors::{PlannerError, Result};
use crate::record_normalizer::RawRow;
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use std::collections::HashMap;
use std::path::PathBuf;

/// Source of raw table rows
pub trait DatasetProvider {
    /// Rows of `dataset` in file order
    fn rows(&self, dataset: &DatasetConfig) -> Result<Vec<RawRow>>;
}

/// Reads tables from CSV files in a data directory
#[derive(Debug, Clone)]
pub struct CsvDatasetProvider {
    data_dir: PathBuf,
}

impl CsvDatasetProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

impl DatasetProvider for CsvDatasetProvider {
    fn rows(&self, dataset: &DatasetConfig) -> Result<Vec<RawRow>> {
        let path = dataset.path_in(&self.data_dir);
        info!(
            "Reading {} from {}, skipping the first {} rows",
            dataset.name,
            path.display(),
            dataset.rows_to_skip
        );

        let dataset_error = |message: String| PlannerError::Dataset {
            dataset: dataset.name.clone(),
            message,
        };

        // Columns are matched by position, so headers are just more junk rows.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .from_path(&path)
            .map_err(|e| dataset_error(format!("{}: {e}", path.display())))?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| dataset_error(e.to_string()))?;
            if index < dataset.rows_to_skip {
                continue;
            }

            // The csv reader skips empty lines, so take the line from the record itself.
            let line = record
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(index + 1);
            let mut row = RawRow::new(line);
            for (position, field) in dataset.field_names.iter().enumerate() {
                row.insert(field.as_str(), record.get(position).unwrap_or(""));
            }
            rows.push(row);
        }

        debug!("Read {} rows from {}", rows.len(), dataset.name);
        Ok(rows)
    }
}

/// Serves rows held in memory, keyed by dataset name
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasetProvider {
    tables: HashMap<String, Vec<RawRow>>,
}

impl InMemoryDatasetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rows for a dataset name
    pub fn with_table(mut self, name: &str, rows: Vec<RawRow>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }
}

impl DatasetProvider for InMemoryDatasetProvider {
    fn rows(&self, dataset: &DatasetConfig) -> Result<Vec<RawRow>> {
        self.tables
            .get(&dataset.name)
            .cloned()
            .ok_or_else(|| PlannerError::Dataset {
                dataset: dataset.name.clone(),
                message: "no such table".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_csv_rows_skip_junk_and_map_columns() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("purchases.csv")).unwrap();
        writeln!(file, "Name,Count,Units,Unit").unwrap();
        writeln!(file, "carrot,1,2,lbs").unwrap();
        writeln!(file, "onion,3").unwrap();

        let provider = CsvDatasetProvider::new(dir.path());
        let rows = provider.rows(&DatasetConfig::purchases()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("name"), "carrot");
        assert_eq!(rows[0].get("unitsPerCount"), "2");
        assert_eq!(rows[1].get("count"), "3");
        assert_eq!(rows[1].get("unit"), "");
    }

    #[test]
    fn test_rows_keep_sheet_line_past_empty_lines() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("purchases.csv"), "name,count\n\n\nrice,1\n").unwrap();

        let provider = CsvDatasetProvider::new(dir.path());
        let rows = provider.rows(&DatasetConfig::purchases()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), "rice");
        assert_eq!(rows[0].line, 4);
    }

    #[test]
    fn test_missing_file_is_dataset_error() {
        let dir = TempDir::new().unwrap();
        let provider = CsvDatasetProvider::new(dir.path());
        let error = provider.rows(&DatasetConfig::ingredients()).unwrap_err();
        assert_eq!(error.kind(), "dataset");
    }

    #[test]
    fn test_in_memory_tables() {
        let provider = InMemoryDatasetProvider::new()
            .with_table("ingredients", vec![RawRow::from_pairs(1, [("name", "salt")])]);
        assert_eq!(provider.rows(&DatasetConfig::ingredients()).unwrap().len(), 1);
        assert!(provider.rows(&DatasetConfig::menus()).is_err());
    }
}
