//! Cell reference parsing and formatting.
//!
//! Converts between spreadsheet-style references ("A1", "D3", "AA100") and the
//! zero-indexed row/column pairs the cell writer takes.
//!
//! # Examples
//!
//! ```
//! use sheetxfer_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("D3").unwrap();
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.col, 3);
//! assert_eq!(cell.to_string(), "D3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static A1_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)\s*$").expect("A1 pattern compiles")
});

/// A zero-indexed cell position.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse `A1` notation, ignoring case and surrounding whitespace.
    ///
    /// `None` for malformed input, row 0, or a reference too large for `usize`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = A1_PATTERN.captures(name)?;

        let col = caps["letters"]
            .bytes()
            .map(|b| (b.to_ascii_uppercase() - b'A') as usize + 1)
            .try_fold(0usize, |acc, digit| acc.checked_mul(26)?.checked_add(digit))?
            .checked_sub(1)?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef { row, col })
    }

    /// Column letters for a zero-based index: 0 is `A`, 26 is `AA`.
    pub fn col_to_letters(col: usize) -> String {
        let mut letters = Vec::new();
        let mut rest = col as u128 + 1;
        while rest > 0 {
            rest -= 1;
            letters.push(b'A' + (rest % 26) as u8);
            rest /= 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}
