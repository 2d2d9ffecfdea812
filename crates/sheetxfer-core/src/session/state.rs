use sheetxfer_engine::engine::{ColumnStats, Operation, column_stats};
use std::sync::Arc;

use crate::workbook::{Workbook, WorkbookId};

/// Largest row count of an xlsx sheet.
pub const XLSX_MAX_ROWS: usize = 1_048_576;
/// Largest column count of an xlsx sheet.
pub const XLSX_MAX_COLS: usize = 16_384;

/// Upper bounds for transfer target cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_rows: XLSX_MAX_ROWS,
            max_cols: XLSX_MAX_COLS,
        }
    }
}

/// Where the aggregated column comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceSelection {
    pub workbook: WorkbookId,
    pub sheet: String,
    pub column: usize,
}

/// Where the transferred value goes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetSelection {
    pub workbook: WorkbookId,
    pub sheet: String,
    pub row: usize,
    pub col: usize,
}

/// The user's current choices. Never persisted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    pub source: Option<SourceSelection>,
    pub operation: Operation,
    pub target: Option<TargetSelection>,
}

/// Where the session stands in the select → transfer cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferState {
    /// No source, or the source column has no numeric values.
    NoStats,
    /// Stats are available and a transfer may run.
    StatsReady,
    /// The last transfer succeeded and nothing changed since.
    Transferred,
}

/// Record of a completed transfer.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferReceipt {
    pub workbook: WorkbookId,
    pub sheet: String,
    pub row: usize,
    pub col: usize,
    pub operation: Operation,
    pub value: f64,
}

/// UI-agnostic session state: the loaded workbooks plus the selection.
///
/// Workbooks are immutable snapshots; a transfer swaps in a new `Arc` for the
/// target rather than mutating it.
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded workbooks in load order
    pub(crate) workbooks: Vec<Arc<Workbook>>,
    pub(crate) selection: Selection,
    /// Stats for the current source selection, recomputed on every source change
    pub(crate) stats: Option<ColumnStats>,
    pub(crate) last_transfer: Option<TransferReceipt>,
    pub(crate) limits: Limits,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Session {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn workbooks(&self) -> &[Arc<Workbook>] {
        &self.workbooks
    }

    pub fn workbook(&self, id: WorkbookId) -> Option<&Arc<Workbook>> {
        self.workbooks.iter().find(|wb| wb.id() == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stats(&self) -> Option<&ColumnStats> {
        self.stats.as_ref()
    }

    pub fn last_transfer(&self) -> Option<&TransferReceipt> {
        self.last_transfer.as_ref()
    }

    pub fn state(&self) -> TransferState {
        match (&self.stats, &self.last_transfer) {
            (None, _) => TransferState::NoStats,
            (Some(_), Some(_)) => TransferState::Transferred,
            (Some(_), None) => TransferState::StatsReady,
        }
    }

    pub fn can_transfer(&self) -> bool {
        self.stats.is_some() && self.selection.target.is_some()
    }

    /// The value a transfer would write for the selected operation.
    pub fn selected_value(&self) -> Option<f64> {
        self.stats
            .as_ref()
            .map(|stats| stats.transfer_value(self.selection.operation))
    }

    /// Recompute stats from the current source selection.
    pub(crate) fn refresh_stats(&mut self) {
        self.stats = self.selection.source.as_ref().and_then(|source| {
            let workbook = self.workbook(source.workbook)?;
            let grid = workbook.sheet(&source.sheet)?;
            column_stats(grid, source.column)
        });
        tracing::debug!(stats = ?self.stats, "recomputed column stats");
    }
}
