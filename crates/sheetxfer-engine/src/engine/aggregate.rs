//! Column statistics.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::cell::Grid;
use super::column::{extract_column, to_numbers};

/// The statistic a transfer writes into the target cell.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum Operation {
    #[default]
    Average,
    Sum,
    Min,
    Max,
    Count,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Average,
        Operation::Sum,
        Operation::Min,
        Operation::Max,
        Operation::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Average => "average",
            Operation::Sum => "sum",
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::Count => "count",
        }
    }

    /// Whether the transferred value is rounded to 2 decimal places.
    pub fn is_rounded(self) -> bool {
        matches!(self, Operation::Average | Operation::Sum)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "avg" | "mean" => Ok(Operation::Average),
            "sum" => Ok(Operation::Sum),
            "min" | "minimum" => Ok(Operation::Min),
            "max" | "maximum" => Ok(Operation::Max),
            "count" => Ok(Operation::Count),
            other => Err(format!(
                "Unknown operation: {} (expected average, sum, min, max or count)",
                other
            )),
        }
    }
}

/// Statistics over the numeric values of one column.
///
/// Only produced for a non-empty input, so `count >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ColumnStats {
    pub average: f64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl ColumnStats {
    /// Unrounded value of a statistic.
    pub fn value(&self, op: Operation) -> f64 {
        match op {
            Operation::Average => self.average,
            Operation::Sum => self.sum,
            Operation::Min => self.min,
            Operation::Max => self.max,
            Operation::Count => self.count as f64,
        }
    }

    /// The value written by a transfer: average and sum rounded to 2 places,
    /// everything else verbatim.
    pub fn transfer_value(&self, op: Operation) -> f64 {
        let value = self.value(op);
        if op.is_rounded() {
            round_half_up(value, 2)
        } else {
            value
        }
    }
}

/// Compute all five statistics, or `None` for an empty input.
pub fn aggregate(numbers: &[f64]) -> Option<ColumnStats> {
    let (&first, _) = numbers.split_first()?;

    let mut sum = 0.0;
    let mut min = first;
    let mut max = first;
    for &n in numbers {
        sum += n;
        min = min.min(n);
        max = max.max(n);
    }
    let count = numbers.len();

    Some(ColumnStats {
        average: sum / count as f64,
        sum,
        min,
        max,
        count,
    })
}

/// Extract, coerce and aggregate column `col` of `grid`.
pub fn column_stats(grid: &Grid, col: usize) -> Option<ColumnStats> {
    aggregate(&to_numbers(extract_column(grid, col)))
}

/// Round to `places` decimals, halves rounding towards positive infinity on
/// the scaled value.
pub fn round_half_up(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places);
    (value * scale + 0.5).floor() / scale
}
