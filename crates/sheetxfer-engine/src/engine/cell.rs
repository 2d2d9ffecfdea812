//! Cell data structures for sheet grids.
//!
//! This module provides the core data types for representing sheet contents:
//! - [`CellValue`] - A loosely-typed cell (empty, number, or text)
//! - [`Row`] - An ordered run of cells; rows in one grid may differ in length
//! - [`Grid`] - An ordered sequence of rows with copy-on-write row storage

use std::fmt;
use std::sync::Arc;

use super::format::format_number;

/// The value stored in a single cell.
///
/// Values are kept exactly as decoded; coercion to numbers only happens when a
/// column is aggregated.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    /// True for `Empty` and for empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Raw display form. Numbers use the shortest round-trip representation
/// (`15`, `2.33`, `0.001`).
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One row of a grid.
pub type Row = Vec<CellValue>;

/// A sheet's contents: rows in order, row 0 conventionally the header.
///
/// Rows are shared behind `Arc`, so cloning a grid is cheap and a write only
/// copies the row it touches. A grid is never mutated in place once shared;
/// see [`write_cell`](super::write_cell).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Arc<Row>>,
}

impl Grid {
    pub fn new() -> Grid {
        Grid::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Grid {
        Grid {
            rows: rows.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Row 0, or an empty slice for an empty grid.
    pub fn header(&self) -> &[CellValue] {
        self.row(0).unwrap_or(&[])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Owned copy of all rows.
    pub fn to_rows(&self) -> Vec<Row> {
        self.rows.iter().map(|r| r.as_ref().clone()).collect()
    }

    /// True when `other` still points at the same storage for `row`.
    pub fn shares_row_with(&self, other: &Grid, row: usize) -> bool {
        match (self.rows.get(row), other.rows.get(row)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Arc<Row>> {
        &mut self.rows
    }
}

impl From<Vec<Row>> for Grid {
    fn from(rows: Vec<Row>) -> Self {
        Grid::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("").is_blank());
        assert!(!CellValue::text(" ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_display_uses_shortest_form() {
        assert_eq!(CellValue::Number(15.0).to_string(), "15");
        assert_eq!(CellValue::Number(2.33).to_string(), "2.33");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::text("x").to_string(), "x");
    }

    #[test]
    fn test_grid_accessors_tolerate_jagged_rows() {
        let grid = Grid::from_rows(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec![CellValue::Number(1.0)],
        ]);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(1, 0), Some(&CellValue::Number(1.0)));
        assert_eq!(grid.cell(1, 2), None);
        assert_eq!(grid.cell(5, 0), None);
        assert_eq!(grid.header().len(), 3);
    }

    #[test]
    fn test_empty_grid_header() {
        let grid = Grid::new();
        assert!(grid.is_empty());
        assert!(grid.header().is_empty());
        assert_eq!(grid.width(), 0);
    }

    #[test]
    fn test_clone_shares_rows() {
        let grid = Grid::from_rows(vec![vec!["a".into()]]);
        let copy = grid.clone();
        assert!(grid.shares_row_with(&copy, 0));
    }
}
