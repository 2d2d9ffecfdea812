//! Tabular preview of a grid: header labels plus the first data rows.

use super::cell::Grid;
use super::format::format_value;

/// Number of data rows shown when no limit is configured.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Display strings for the head of a sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    /// One label per column of the widest shown row.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Data rows in the sheet, header excluded.
    pub total_rows: usize,
}

impl Preview {
    pub fn new(grid: &Grid, limit: usize) -> Preview {
        let header = grid.header();
        let shown: Vec<&[_]> = grid.rows().skip(1).take(limit).collect();
        let width = shown
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let headers = (0..width)
            .map(|col| column_label(grid, col))
            .collect();

        let rows = shown
            .iter()
            .map(|row| {
                (0..width)
                    .map(|col| row.get(col).map(format_value).unwrap_or_default())
                    .collect()
            })
            .collect();

        Preview {
            headers,
            rows,
            total_rows: grid.len().saturating_sub(1),
        }
    }

    /// True when rows were cut off by the limit.
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }
}

/// Header text for `col`, or `Column N` (1-based) when blank or missing.
pub fn column_label(grid: &Grid, col: usize) -> String {
    match grid.header().get(col) {
        Some(value) if !value.is_blank() => format_value(value),
        _ => format!("Column {}", col + 1),
    }
}
