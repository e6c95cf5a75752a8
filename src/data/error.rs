use std::path::PathBuf;

use thiserror::Error;

/// Schema and format problems found while loading a passenger file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{source_kind} is missing required column '{column}'")]
    MissingColumn {
        source_kind: &'static str,
        column: &'static str,
    },

    #[error("Column '{column}' has unsupported type {found}")]
    ColumnType { column: &'static str, found: String },

    #[error("Row {row}: '{column}' must not be empty")]
    EmptyCell { row: usize, column: &'static str },

    #[error("Cannot read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
