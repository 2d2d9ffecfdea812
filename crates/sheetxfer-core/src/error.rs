//! Error types for sheetxfer core.

use thiserror::Error;

use crate::workbook::WorkbookId;

/// Errors that can occur while loading, transferring or exporting workbooks
#[derive(Error, Debug)]
pub enum SheetxferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed to decode {file}: {message}")]
    Decode { file: String, message: String },

    #[error("Failed to encode workbook: {0}")]
    Encode(String),

    #[error("Unsupported file type: {0} (expected .xlsx, .xls or .csv)")]
    UnsupportedFormat(String),

    #[error("Workbook not found: {0}")]
    WorkbookNotFound(WorkbookId),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("No source workbook selected")]
    NoSourceSelected,

    #[error("No target workbook selected")]
    NoTargetSelected,

    #[error("No statistics available: the selected column has no numeric values")]
    NoStats,

    #[error("Target cell (row {row}, column {col}) is beyond the limit of {max_rows} rows x {max_cols} columns")]
    TargetOutOfBounds {
        row: usize,
        col: usize,
        max_rows: usize,
        max_cols: usize,
    },
}

impl From<rust_xlsxwriter::XlsxError> for SheetxferError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SheetxferError::Encode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetxferError>;
