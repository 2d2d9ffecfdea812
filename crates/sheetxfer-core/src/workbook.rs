//! Workbooks: named, ordered collections of sheets decoded from one file.

use sheetxfer_engine::engine::Grid;
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, SheetxferError};

/// Identity of a workbook within a session.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct WorkbookId(Uuid);

impl WorkbookId {
    pub fn new() -> WorkbookId {
        WorkbookId(Uuid::new_v4())
    }
}

impl Default for WorkbookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkbookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

/// An immutable snapshot of one loaded file.
///
/// Updates go through [`Workbook::with_sheet`], which returns a new snapshot
/// with the same id.
#[derive(Clone, Debug)]
pub struct Workbook {
    id: WorkbookId,
    name: String,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build a workbook from decoded sheets. Later sheets whose name repeats an
    /// earlier one are dropped.
    pub fn new(name: impl Into<String>, sheets: Vec<(String, Grid)>) -> Workbook {
        let mut unique: Vec<Sheet> = Vec::with_capacity(sheets.len());
        for (name, grid) in sheets {
            if unique.iter().any(|s| s.name == name) {
                tracing::warn!(sheet = %name, "dropping duplicate sheet name");
                continue;
            }
            unique.push(Sheet { name, grid });
        }
        Workbook {
            id: WorkbookId::new(),
            name: name.into(),
            sheets: unique,
        }
    }

    pub fn id(&self) -> WorkbookId {
        self.id
    }

    /// Display name, the file name it was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn first_sheet_name(&self) -> Option<&str> {
        self.sheets.first().map(|s| s.name.as_str())
    }

    pub fn sheet(&self, name: &str) -> Option<&Grid> {
        self.sheets.iter().find(|s| s.name == name).map(|s| &s.grid)
    }

    /// A new snapshot with sheet `name` replaced by `grid`.
    pub fn with_sheet(&self, name: &str, grid: Grid) -> Result<Workbook> {
        let index = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SheetxferError::SheetNotFound(name.to_string()))?;

        let mut sheets = self.sheets.clone();
        sheets[index].grid = grid;
        Ok(Workbook {
            id: self.id,
            name: self.name.clone(),
            sheets,
        })
    }

    /// One-line description: name and sheet list.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.sheet_names().collect();
        format!(
            "{} ({} sheet{}: {})",
            self.name,
            names.len(),
            if names.len() == 1 { "" } else { "s" },
            names.join(", ")
        )
    }
}
