use super::Session;
use crate::error::{Result, SheetxferError};
use crate::storage::{self, SourceFile};
use crate::workbook::{Workbook, WorkbookId};
use std::sync::Arc;
use std::thread;

/// Outcome of loading one batch of files.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    /// Workbooks added, in batch order
    pub loaded: Vec<WorkbookId>,
    /// Files skipped for their suffix: (file name, reason)
    pub rejected: Vec<(String, String)>,
    /// Files that failed to decode: (file name, reason)
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_empty()
    }
}

impl Session {
    /// Decode a batch of files and append every one that succeeds.
    ///
    /// Files are decoded concurrently. A file that fails to decode (or whose
    /// decoder panics) is reported and skipped; the rest of the batch still
    /// loads, and workbooks are appended in the order the files were given.
    pub fn ingest(&mut self, files: Vec<SourceFile>) -> BatchReport {
        let mut report = BatchReport::default();

        let accepted: Vec<SourceFile> = files
            .into_iter()
            .filter_map(|file| {
                if file.format().is_some() {
                    Some(file)
                } else {
                    tracing::warn!(file = %file.name, "skipping file with unsupported suffix");
                    report.rejected.push((
                        file.name.clone(),
                        "unsupported file type (expected .xlsx, .xls or .csv)".to_string(),
                    ));
                    None
                }
            })
            .collect();

        let outcomes: Vec<(String, Result<Workbook>)> = thread::scope(|scope| {
            let handles: Vec<_> = accepted
                .iter()
                .map(|file| {
                    let handle = scope.spawn(move || {
                        storage::decode(file).map(|sheets| Workbook::new(file.name.clone(), sheets))
                    });
                    (file.name.clone(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(SheetxferError::Decode {
                            file: name.clone(),
                            message: "decoder panicked".to_string(),
                        })
                    });
                    (name, result)
                })
                .collect()
        });

        for (name, outcome) in outcomes {
            match outcome {
                Ok(workbook) => {
                    tracing::info!(file = %name, summary = %workbook.summary(), "loaded workbook");
                    report.loaded.push(self.add_workbook(workbook));
                }
                Err(err) => {
                    tracing::warn!(file = %name, error = %err, "failed to load workbook");
                    report.failed.push((name, err.to_string()));
                }
            }
        }

        report
    }

    /// Append an already-decoded workbook.
    pub fn add_workbook(&mut self, workbook: Workbook) -> WorkbookId {
        let id = workbook.id();
        self.workbooks.push(Arc::new(workbook));
        id
    }

    /// Drop a workbook from the session.
    ///
    /// A source or target selection pointing at it is cleared and stats are
    /// recomputed from whatever source remains.
    pub fn remove_workbook(&mut self, id: WorkbookId) -> Result<Arc<Workbook>> {
        let index = self
            .workbooks
            .iter()
            .position(|wb| wb.id() == id)
            .ok_or(SheetxferError::WorkbookNotFound(id))?;
        let removed = self.workbooks.remove(index);

        if self.selection.source.as_ref().is_some_and(|s| s.workbook == id) {
            self.selection.source = None;
        }
        if self.selection.target.as_ref().is_some_and(|t| t.workbook == id) {
            self.selection.target = None;
        }
        self.last_transfer = None;
        self.refresh_stats();
        tracing::debug!(workbook = %id, name = removed.name(), "removed workbook");
        Ok(removed)
    }

    /// Encode a workbook for download. Returns the file name and bytes.
    pub fn export(&self, id: WorkbookId) -> Result<(String, Vec<u8>)> {
        let workbook = self
            .workbook(id)
            .ok_or(SheetxferError::WorkbookNotFound(id))?;
        storage::encode(workbook)
    }
}
