//! Dataset acquisition for the linked-selection dashboard

pub mod loader;
pub mod schema;
pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use loader::{DatasetLoader, LoadOutcome, LoadTicket};
pub use schema::{AttributeSchema, SchemaInferencer};
pub use sources::CsvSource;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
