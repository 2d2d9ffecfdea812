//! sheetxfer-core - Workbook model, spreadsheet codecs and transfer session.

pub mod error;
pub mod session;
pub mod storage;
pub mod workbook;

pub use error::{Result, SheetxferError};
pub use session::{
    BatchReport, Limits, Selection, Session, SourceSelection, TargetSelection, TransferReceipt,
    TransferState,
};
pub use storage::{SourceFile, SourceFormat};
pub use workbook::{Sheet, Workbook, WorkbookId};

pub use sheetxfer_engine::engine::{CellRef, CellValue, ColumnStats, Grid, Operation};
