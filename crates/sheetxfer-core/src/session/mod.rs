//! Session state and logic (UI-agnostic).

mod io;
mod ops;
mod state;

pub use io::BatchReport;
pub use state::{
    Limits, Selection, Session, SourceSelection, TargetSelection, TransferReceipt, TransferState,
    XLSX_MAX_COLS, XLSX_MAX_ROWS,
};
