//! CSV data source
//!
//! One-shot fetch-and-parse: the whole file becomes a [`Dataset`]. There is
//! no incremental loading; the tables this dashboard targets are small and
//! are replaced wholesale on every selector change.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use async_trait::async_trait;
use csv::ReaderBuilder;

use bl_core::data::{DataSource, Dataset, Record};

use crate::DataError;

/// CSV data source for loading a tabular file
pub struct CsvSource {
    path: PathBuf,
    name: String,
}

impl CsvSource {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();
        Self { path, name }
    }

    /// Parse CSV from any reader. An empty input (no header row) is valid
    /// and yields an empty dataset.
    pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = match csv_reader.headers() {
            Ok(headers) if headers.len() > 0 => {
                headers.iter().map(|h| h.to_string()).collect()
            }
            // csv reports an error on a zero-byte file; treat it as empty.
            _ => return Ok(Dataset::default()),
        };

        if columns.iter().all(|c| c.is_empty()) {
            return Ok(Dataset::default());
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let mut values: Vec<String> = record.iter().map(|v| v.to_string()).collect();
            // Short rows still align with the header.
            values.resize(columns.len(), String::new());
            values.truncate(columns.len());
            rows.push(Record::new(values));
        }

        Ok(Dataset::new(columns, rows))
    }
}

#[async_trait]
impl DataSource for CsvSource {
    async fn load(&self) -> anyhow::Result<Dataset> {
        let path = self.path.clone();
        let dataset = tokio::task::spawn_blocking(move || -> Result<Dataset, DataError> {
            let file = File::open(&path)?;
            Self::read_dataset(BufReader::new(file))
        })
        .await
        .map_err(DataError::from)??;

        tracing::info!(
            source = %self.name,
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "loaded CSV dataset"
        );
        Ok(dataset)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let input = "size,grp\n1,a\n2,b\n";
        let ds = CsvSource::read_dataset(input.as_bytes()).unwrap();

        assert_eq!(ds.columns(), &["size".to_string(), "grp".to_string()]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(1, 0), Some("2"));
        assert_eq!(ds.value(1, 1), Some("b"));
    }

    #[test]
    fn empty_file_is_a_valid_empty_dataset() {
        let ds = CsvSource::read_dataset("".as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert!(ds.columns().is_empty());
    }

    #[test]
    fn header_only_file_has_columns_but_no_rows() {
        let ds = CsvSource::read_dataset("a,b,c\n".as_bytes()).unwrap();
        assert_eq!(ds.columns().len(), 3);
        assert!(ds.is_empty());
    }

    #[test]
    fn short_rows_are_padded_to_the_header_width() {
        let ds = CsvSource::read_dataset("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(ds.value(0, 2), Some(""));
    }

    #[test]
    fn missing_values_stay_empty_strings() {
        let ds = CsvSource::read_dataset("a,b\n1,\n,2\n".as_bytes()).unwrap();
        assert_eq!(ds.value(0, 1), Some(""));
        assert_eq!(ds.value(1, 0), Some(""));
        assert_eq!(ds.numeric_value(0, 1), None);
    }
}
