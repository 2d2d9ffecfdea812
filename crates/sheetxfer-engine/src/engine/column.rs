//! Column extraction and numeric coercion.

use super::cell::{CellValue, Grid};

static EMPTY: CellValue = CellValue::Empty;

/// Values of column `col` for every row after the header.
///
/// Rows shorter than `col + 1` yield `Empty`; the result always has one entry
/// per data row.
pub fn extract_column(grid: &Grid, col: usize) -> Vec<&CellValue> {
    grid.rows()
        .skip(1)
        .map(|row| row.get(col).unwrap_or(&EMPTY))
        .collect()
}

/// Coerce one cell to a number, or `None` when it should be skipped.
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(n) if n.is_nan() => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) if s.is_empty() => None,
        CellValue::Text(s) => parse_float_prefix(s),
    }
}

/// Numbers from a column in order, skipping blanks and non-numeric text.
pub fn to_numbers<'a, I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values.into_iter().filter_map(coerce_number).collect()
}

/// Parse the longest leading decimal number in `s`.
///
/// Leading whitespace is skipped. Accepts `[+-]digits[.digits][e[+-]digits]`
/// with at least one mantissa digit, or `[+-]Infinity`. Trailing text after
/// the number is ignored, so `"12abc"` parses as 12.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if s[i..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        // A bare "e" is not part of the number.
        if j > digits_start {
            exponent = &s[i..j];
        }
    }

    let mut normalized = String::with_capacity(int_digits.len() + frac_digits.len() + 8);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_digits);
    }
    normalized.push_str(exponent);

    normalized.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn grid(rows: Vec<Vec<CellValue>>) -> Grid {
        Grid::from_rows(rows)
    }

    #[test]
    fn test_extract_skips_header() {
        let g = grid(vec![
            vec!["Name".into(), "Score".into()],
            vec!["A".into(), CellValue::Number(10.0)],
            vec!["B".into(), CellValue::Number(20.0)],
        ]);
        assert_eq!(
            extract_column(&g, 1),
            vec![&CellValue::Number(10.0), &CellValue::Number(20.0)]
        );
    }

    #[test]
    fn test_extract_short_rows_yield_empty() {
        let g = grid(vec![
            vec!["a".into(), "b".into()],
            vec!["x".into()],
            vec![],
        ]);
        assert_eq!(extract_column(&g, 1), vec![&CellValue::Empty, &CellValue::Empty]);
    }

    #[test]
    fn test_extract_beyond_header_width_is_not_an_error() {
        let g = grid(vec![
            vec!["only".into()],
            vec![CellValue::Number(1.0), CellValue::Number(2.0), CellValue::Number(3.0)],
        ]);
        assert_eq!(extract_column(&g, 2), vec![&CellValue::Number(3.0)]);
    }

    #[test]
    fn test_extract_empty_grid() {
        assert!(extract_column(&Grid::new(), 0).is_empty());
    }

    #[test]
    fn test_to_numbers_skip_rules() {
        let values = [
            CellValue::Number(10.0),
            CellValue::Empty,
            CellValue::text(""),
            CellValue::text("x"),
            CellValue::text("2.5"),
            CellValue::Number(f64::NAN),
            CellValue::text("  7 "),
        ];
        assert_eq!(to_numbers(values.iter()), vec![10.0, 2.5, 7.0]);
    }

    #[test]
    fn test_to_numbers_keeps_duplicates_and_order() {
        let values = [
            CellValue::Number(3.0),
            CellValue::Number(1.0),
            CellValue::Number(3.0),
        ];
        assert_eq!(to_numbers(values.iter()), vec![3.0, 1.0, 3.0]);
    }

    #[test]
    fn test_parse_float_prefix_forms() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("-3.5"), Some(-3.5));
        assert_eq!(parse_float_prefix("+.5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_float_prefix("1E-2"), Some(0.01));
        assert_eq!(parse_float_prefix("12abc"), Some(12.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("3e+x"), Some(3.0));
        assert_eq!(parse_float_prefix("   8"), Some(8.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_float_prefix_rejects_non_numbers() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("$5"), None);
        assert_eq!(parse_float_prefix("NaN"), None);
        assert_eq!(parse_float_prefix("inf"), None);
    }

    proptest! {
        #[test]
        fn prop_extract_length_is_rows_minus_header(
            widths in proptest::collection::vec(0usize..6, 0..20),
            col in 0usize..8,
        ) {
            let rows: Vec<Vec<CellValue>> = widths
                .iter()
                .map(|w| (0..*w).map(|c| CellValue::Number(c as f64)).collect())
                .collect();
            let g = Grid::from_rows(rows.clone());
            let column = extract_column(&g, col);
            prop_assert_eq!(column.len(), rows.len().saturating_sub(1));
            for (value, row) in column.iter().zip(rows.iter().skip(1)) {
                prop_assert_eq!(*value, row.get(col).unwrap_or(&CellValue::Empty));
            }
        }

        #[test]
        fn prop_finite_numbers_parse_from_their_display(n in -1.0e12f64..1.0e12) {
            prop_assert_eq!(parse_float_prefix(&n.to_string()), Some(n));
        }
    }
}
