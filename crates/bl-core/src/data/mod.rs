//! Tabular data model
//!
//! A [`Dataset`] is an immutable, ordered collection of string-valued rows.
//! Rows are identified by position ([`RecordId`]), never by content, so
//! duplicate-valued rows remain independently selectable. Typed access is
//! layered on top at schema-inference time via [`Attribute`].

/// Row identity: position within the current [`Dataset`].
pub type RecordId = usize;

/// One dataset row. Values are kept raw; `values[i]` belongs to
/// `Dataset::columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Raw value at a column index, if the row has one.
    pub fn value(&self, column: usize) -> Option<&str> {
        self.values.get(column).map(|s| s.as_str())
    }
}

/// An immutable table: header row plus data rows. Replaced wholesale on
/// reload, never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.rows.get(id)
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw value of `column` in row `id`.
    pub fn value(&self, id: RecordId, column: usize) -> Option<&str> {
        self.rows.get(id).and_then(|r| r.value(column))
    }

    /// Numeric value of `column` in row `id`. `None` for empty or
    /// non-numeric values; accepts decimal and scientific notation.
    pub fn numeric_value(&self, id: RecordId, column: usize) -> Option<f64> {
        self.value(id, column).and_then(parse_numeric)
    }
}

/// Parse a raw cell into a finite number. Empty cells never qualify.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classification of a column, decided once at schema-inference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Every row's value is non-empty and parses as a finite number.
    Numeric,
    /// Everything else.
    Categorical,
}

/// A column with its inferred kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

/// Trait for data sources
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Load the full dataset. An empty table is a valid result.
    async fn load(&self) -> anyhow::Result<Dataset>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dataset() -> Dataset {
        Dataset::new(
            vec!["size".into(), "grp".into()],
            vec![
                Record::new(vec!["1".into(), "a".into()]),
                Record::new(vec!["1".into(), "a".into()]),
                Record::new(vec!["".into(), "b".into()]),
            ],
        )
    }

    #[test]
    fn duplicate_rows_have_distinct_identities() {
        let ds = small_dataset();
        assert_eq!(ds.record(0), ds.record(1));
        assert_eq!(ds.value(0, 0), ds.value(1, 0));
        // Identity is positional, so both ids stay addressable.
        assert_ne!(0 as RecordId, 1 as RecordId);
    }

    #[test]
    fn numeric_value_rejects_empty_and_text() {
        let ds = small_dataset();
        assert_eq!(ds.numeric_value(0, 0), Some(1.0));
        assert_eq!(ds.numeric_value(2, 0), None);
        assert_eq!(ds.numeric_value(0, 1), None);
    }

    #[test]
    fn parse_numeric_accepts_scientific_notation() {
        assert_eq!(parse_numeric("1.5e2"), Some(150.0));
        assert_eq!(parse_numeric("-3.25"), Some(-3.25));
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric(""), None);
    }
}
