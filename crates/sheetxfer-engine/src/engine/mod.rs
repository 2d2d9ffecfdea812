//! Aggregation engine API.
//!
//! This module provides the in-memory computation behind a transfer:
//!
//! - [`CellValue`], [`Row`], [`Grid`] - Data structures for sheet contents
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`extract_column`], [`to_numbers`] - Column extraction and numeric coercion
//! - [`aggregate`], [`ColumnStats`], [`Operation`] - Column statistics
//! - [`write_cell`] - Copy-on-write single-cell update with padding
//! - [`format_number`], [`Preview`] - Values for display

mod aggregate;
mod cell;
mod cell_ref;
mod column;
mod format;
mod preview;
mod write;

pub use aggregate::{ColumnStats, Operation, aggregate, column_stats, round_half_up};
pub use cell::{CellValue, Grid, Row};
pub use cell_ref::CellRef;
pub use column::{coerce_number, extract_column, parse_float_prefix, to_numbers};
pub use format::{format_number, format_value};
pub use preview::{DEFAULT_PREVIEW_ROWS, Preview, column_label};
pub use write::write_cell;
