//! CSV decode/encode

use crate::error::{Result, SheetxferError};
use sheetxfer_engine::engine::{CellValue, Grid, Row};

/// Decode CSV bytes into a grid.
///
/// Fully blank records are dropped and every row is padded with `Empty` to the
/// width of the widest record.
pub fn decode_csv(bytes: &[u8]) -> Result<Grid> {
    let text = String::from_utf8_lossy(bytes);
    let content = text.strip_prefix('\u{feff}').unwrap_or(text.as_ref());

    let records = parse_csv_records(content)?;
    let mut rows: Vec<Row> = records
        .into_iter()
        .filter(|record| record.iter().any(|field| !field.is_empty()))
        .map(|record| record.iter().map(|f| parse_csv_field(f)).collect())
        .collect();

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, CellValue::Empty);
    }

    tracing::debug!(rows = rows.len(), width, "decoded csv");
    Ok(Grid::from_rows(rows))
}

/// Split CSV content into records, handling quoted fields.
///
/// Quoted fields may contain commas, doubled quotes and line breaks. Unquoted
/// fields are trimmed; quoted ones keep their whitespace.
pub(crate) fn parse_csv_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = content.chars().peekable();

    fn finish_field(fields: &mut Vec<String>, current: &mut String, quoted: bool) {
        let field = std::mem::take(current);
        if quoted {
            fields.push(field);
        } else {
            fields.push(field.trim().to_string());
        }
    }

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                if c == '\n' {
                    line += 1;
                }
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                    quote_line = line;
                }
                ',' => {
                    finish_field(&mut fields, &mut current, field_was_quoted);
                    field_was_quoted = false;
                }
                '\r' | '\n' => {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    finish_field(&mut fields, &mut current, field_was_quoted);
                    field_was_quoted = false;
                    records.push(std::mem::take(&mut fields));
                    line += 1;
                }
                _ => current.push(c),
            }
        }
    }

    if in_quotes {
        return Err(SheetxferError::Parse {
            line: quote_line,
            message: "Unterminated quoted field".to_string(),
        });
    }

    if !current.is_empty() || field_was_quoted || !fields.is_empty() {
        finish_field(&mut fields, &mut current, field_was_quoted);
        records.push(fields);
    }

    Ok(records)
}

/// Parse a CSV field into a cell value
/// - Empty string -> Empty
/// - Valid number -> Number (unless it has leading zeros like "007")
/// - Otherwise -> Text
pub(crate) fn parse_csv_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }

    // Quoted fields may keep surrounding whitespace; those stay text.
    let trimmed = field.trim();
    if field != trimmed {
        return CellValue::text(field);
    }

    // Preserve strings that look like numbers but have leading zeros (e.g., "007", "00123")
    // unless they're just "0" or start with "0."
    if trimmed.starts_with('0')
        && trimmed.len() > 1
        && !trimmed.starts_with("0.")
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return CellValue::text(trimmed);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::text(trimmed),
    }
}

/// Encode a grid as CSV. Rows keep their own length.
pub fn encode_csv(grid: &Grid) -> Vec<u8> {
    let mut out = String::new();
    for row in grid.rows() {
        let fields: Vec<String> = row.iter().map(encode_csv_value).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out.into_bytes()
}

fn encode_csv_value(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(_) => value.to_string(),
        CellValue::Text(s) => escape_csv_field(s),
    }
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
        || safe_field.trim() != safe_field
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}
