//! Excel workbooks: read through calamine, written through rust_xlsxwriter.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use sheetxfer_engine::engine::{CellValue, Grid, Row, format_number};

use crate::error::{Result, SheetxferError};
use crate::workbook::Workbook;

/// Decode an `.xlsx` or `.xls` file into its sheets, in workbook order.
///
/// Each sheet's used range is read; fully blank rows are dropped and cells
/// inside the range with no value become `Empty`. Columns left of the used
/// range are filled with `Empty` so indices match the sheet.
pub fn decode_spreadsheet(file_name: &str, bytes: &[u8]) -> Result<Vec<(String, Grid)>> {
    let decode_err = |err: calamine::Error| SheetxferError::Decode {
        file: file_name.to_string(),
        message: err.to_string(),
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(decode_err)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(decode_err)?;
        let first_col = range.start().map_or(0, |(_, col)| col as usize);
        let rows: Vec<Row> = range
            .rows()
            .map(|row| {
                std::iter::repeat_n(CellValue::Empty, first_col)
                    .chain(row.iter().map(convert_value))
                    .collect::<Row>()
            })
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .collect();
        tracing::debug!(file = file_name, sheet = %sheet_name, rows = rows.len(), "decoded sheet");
        sheets.push((sheet_name, Grid::from_rows(rows)));
    }

    Ok(sheets)
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::Bool(v) => CellValue::text(if *v { "TRUE" } else { "FALSE" }),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::Text(v.clone()),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Encode every sheet of `workbook` as an `.xlsx` file.
///
/// Numbers are written as numbers and text as strings; blank cells are not
/// written at all.
pub fn encode_xlsx(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut book = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = book.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (r, row) in sheet.grid.rows().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_blank() {
                    continue;
                }
                // rust_xlsxwriter uses 0-based row/col as u32/u16
                let (Ok(row_num), Ok(col_num)) = (u32::try_from(r), u16::try_from(c)) else {
                    return Err(SheetxferError::Encode(format!(
                        "cell (row {}, column {}) of sheet {} is outside the xlsx grid",
                        r, c, sheet.name
                    )));
                };
                match value {
                    CellValue::Number(n) if n.is_finite() => {
                        worksheet.write_number(row_num, col_num, *n)?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_string(row_num, col_num, format_number(*n))?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }
    }

    Ok(book.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_workbook() -> Workbook {
        Workbook::new(
            "book.xlsx",
            vec![
                (
                    "Scores".to_string(),
                    Grid::from_rows(vec![
                        vec![CellValue::text("Name"), CellValue::text("Score")],
                        vec![CellValue::text("A"), CellValue::Number(10.0)],
                        vec![CellValue::text("B"), CellValue::Number(20.0)],
                    ]),
                ),
                (
                    "Summary".to_string(),
                    Grid::from_rows(vec![vec![CellValue::text("Total")]]),
                ),
            ],
        )
    }

    #[test]
    fn test_round_trip_keeps_sheet_order_and_values() {
        let bytes = encode_xlsx(&sample_workbook()).unwrap();
        let sheets = decode_spreadsheet("book.xlsx", &bytes).unwrap();

        let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Scores", "Summary"]);
        assert_eq!(sheets[0].1.cell(2, 1), Some(&CellValue::Number(20.0)));
        assert_eq!(sheets[1].1.cell(0, 0), Some(&CellValue::text("Total")));
    }

    #[test]
    fn test_blank_rows_dropped_and_gaps_filled() {
        let wb = Workbook::new(
            "gaps.xlsx",
            vec![(
                "S".to_string(),
                Grid::from_rows(vec![
                    vec![CellValue::text("H1"), CellValue::text("H2"), CellValue::text("H3")],
                    vec![],
                    vec![CellValue::Number(1.0), CellValue::Empty, CellValue::Number(3.0)],
                ]),
            )],
        );
        let bytes = encode_xlsx(&wb).unwrap();
        let sheets = decode_spreadsheet("gaps.xlsx", &bytes).unwrap();
        assert_eq!(
            sheets[0].1.to_rows(),
            vec![
                vec![CellValue::text("H1"), CellValue::text("H2"), CellValue::text("H3")],
                vec![CellValue::Number(1.0), CellValue::Empty, CellValue::Number(3.0)],
            ]
        );
    }

    #[test]
    fn test_offset_range_keeps_column_indices() {
        let mut book = XlsxWorkbook::new();
        let sheet = book.add_worksheet();
        sheet.write_string(0, 2, "Score").unwrap();
        sheet.write_number(1, 2, 7.0).unwrap();
        let bytes = book.save_to_buffer().unwrap();

        let sheets = decode_spreadsheet("offset.xlsx", &bytes).unwrap();
        assert_eq!(sheets[0].1.cell(0, 2), Some(&CellValue::text("Score")));
        assert_eq!(sheets[0].1.cell(1, 2), Some(&CellValue::Number(7.0)));
        assert_eq!(sheets[0].1.cell(1, 0), Some(&CellValue::Empty));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = decode_spreadsheet("broken.xlsx", b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, SheetxferError::Decode { ref file, .. } if file == "broken.xlsx"));
    }

    #[test]
    fn test_convert_value_variants() {
        assert_eq!(convert_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_value(&Data::Bool(true)), CellValue::text("TRUE"));
        assert_eq!(convert_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_value(&Data::String("x".to_string())),
            CellValue::text("x")
        );
    }
}
