use super::{Session, SourceSelection, TargetSelection, TransferReceipt};
use crate::error::{Result, SheetxferError};
use crate::workbook::WorkbookId;
use sheetxfer_engine::engine::{CellValue, Operation, write_cell};
use std::sync::Arc;

impl Session {
    /// Resolve `sheet` against a workbook, defaulting to its first sheet.
    fn resolve_sheet(&self, id: WorkbookId, sheet: Option<&str>) -> Result<String> {
        let workbook = self
            .workbook(id)
            .ok_or(SheetxferError::WorkbookNotFound(id))?;
        match sheet {
            Some(name) => workbook
                .sheet(name)
                .map(|_| name.to_string())
                .ok_or_else(|| SheetxferError::SheetNotFound(name.to_string())),
            None => workbook
                .first_sheet_name()
                .map(str::to_string)
                .ok_or_else(|| SheetxferError::SheetNotFound(format!("{} has no sheets", workbook.name()))),
        }
    }

    /// Choose the source workbook. Resets to its first sheet and column 0.
    pub fn select_source(&mut self, id: WorkbookId) -> Result<()> {
        let sheet = self.resolve_sheet(id, None)?;
        self.selection.source = Some(SourceSelection {
            workbook: id,
            sheet,
            column: 0,
        });
        self.source_changed();
        Ok(())
    }

    pub fn select_source_sheet(&mut self, sheet: &str) -> Result<()> {
        let id = self.source()?.workbook;
        let sheet = self.resolve_sheet(id, Some(sheet))?;
        if let Some(source) = self.selection.source.as_mut() {
            source.sheet = sheet;
            source.column = 0;
        }
        self.source_changed();
        Ok(())
    }

    /// Choose the column to aggregate. Any index is accepted; a column past
    /// the header simply yields whatever the data rows hold.
    pub fn select_column(&mut self, column: usize) -> Result<()> {
        let source = self
            .selection
            .source
            .as_mut()
            .ok_or(SheetxferError::NoSourceSelected)?;
        source.column = column;
        self.source_changed();
        Ok(())
    }

    pub fn select_operation(&mut self, operation: Operation) {
        self.selection.operation = operation;
        self.source_changed();
    }

    /// Choose the target workbook. Resets to its first sheet and cell (0, 0).
    pub fn select_target(&mut self, id: WorkbookId) -> Result<()> {
        let sheet = self.resolve_sheet(id, None)?;
        self.selection.target = Some(TargetSelection {
            workbook: id,
            sheet,
            row: 0,
            col: 0,
        });
        self.last_transfer = None;
        Ok(())
    }

    pub fn select_target_sheet(&mut self, sheet: &str) -> Result<()> {
        let id = self.target()?.workbook;
        let sheet = self.resolve_sheet(id, Some(sheet))?;
        if let Some(target) = self.selection.target.as_mut() {
            target.sheet = sheet;
        }
        self.last_transfer = None;
        Ok(())
    }

    pub fn select_target_cell(&mut self, row: usize, col: usize) -> Result<()> {
        let target = self
            .selection
            .target
            .as_mut()
            .ok_or(SheetxferError::NoTargetSelected)?;
        target.row = row;
        target.col = col;
        self.last_transfer = None;
        Ok(())
    }

    /// Write the selected statistic into the target cell.
    ///
    /// Only valid while stats are available. On success the target workbook is
    /// replaced by a new snapshot and stats are recomputed, since source and
    /// target may be the same sheet.
    pub fn transfer(&mut self) -> Result<TransferReceipt> {
        let stats = self.stats.ok_or(SheetxferError::NoStats)?;
        let target = self.target()?.clone();

        if target.row >= self.limits.max_rows || target.col >= self.limits.max_cols {
            return Err(SheetxferError::TargetOutOfBounds {
                row: target.row,
                col: target.col,
                max_rows: self.limits.max_rows,
                max_cols: self.limits.max_cols,
            });
        }

        let index = self
            .workbooks
            .iter()
            .position(|wb| wb.id() == target.workbook)
            .ok_or(SheetxferError::WorkbookNotFound(target.workbook))?;
        let workbook = &self.workbooks[index];
        let grid = workbook
            .sheet(&target.sheet)
            .ok_or_else(|| SheetxferError::SheetNotFound(target.sheet.clone()))?;

        let operation = self.selection.operation;
        let value = stats.transfer_value(operation);
        let updated = write_cell(grid, target.row, target.col, CellValue::Number(value));
        let snapshot = workbook.with_sheet(&target.sheet, updated)?;
        self.workbooks[index] = Arc::new(snapshot);

        let receipt = TransferReceipt {
            workbook: target.workbook,
            sheet: target.sheet,
            row: target.row,
            col: target.col,
            operation,
            value,
        };
        tracing::info!(
            workbook = %receipt.workbook,
            sheet = %receipt.sheet,
            row = receipt.row,
            col = receipt.col,
            operation = %operation,
            value,
            "transferred value"
        );

        self.refresh_stats();
        self.last_transfer = Some(receipt.clone());
        Ok(receipt)
    }

    fn source(&self) -> Result<&SourceSelection> {
        self.selection
            .source
            .as_ref()
            .ok_or(SheetxferError::NoSourceSelected)
    }

    fn target(&self) -> Result<&TargetSelection> {
        self.selection
            .target
            .as_ref()
            .ok_or(SheetxferError::NoTargetSelected)
    }

    fn source_changed(&mut self) {
        self.last_transfer = None;
        self.refresh_stats();
    }
}
