use super::cell::CellValue;

/// Format a cell value for display, showing numbers as stored.
pub fn format_value(value: &CellValue) -> String {
    value.to_string()
}

/// Format a number for display: shortest round-trip form, with `#NAN!` and
/// `#INF!` for values a sheet cannot hold.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else {
        n.to_string()
    }
}
