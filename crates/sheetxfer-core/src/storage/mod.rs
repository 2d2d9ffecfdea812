//! Storage: spreadsheet decode/encode for .xlsx, .xls and .csv files

pub(crate) mod csv;
mod xlsx;

use crate::error::{Result, SheetxferError};
use crate::workbook::Workbook;
use sheetxfer_engine::engine::Grid;
use std::path::Path;

pub use csv::{decode_csv, encode_csv};
pub use xlsx::{decode_spreadsheet, encode_xlsx};

/// Sheet name given to the single sheet of a CSV file.
pub const CSV_SHEET_NAME: &str = "Sheet1";

const MAX_SOURCE_FILE_BYTES: u64 = 256 * 1_048_576; // 256 MiB

/// File formats accepted for upload, detected from the file name suffix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    /// Detect the format from a file name, ignoring case.
    pub fn from_file_name(name: &str) -> Option<SourceFormat> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    /// Extension used when exporting. Legacy `.xls` is written as `.xlsx`.
    pub fn export_extension(self) -> &'static str {
        match self {
            SourceFormat::Xlsx | SourceFormat::Xls => "xlsx",
            SourceFormat::Csv => "csv",
        }
    }
}

/// Raw bytes of one acquired file plus its declared name.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> SourceFile {
        SourceFile {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, named after its final path component.
    pub fn read(path: &Path) -> Result<SourceFile> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SOURCE_FILE_BYTES {
            return Err(SheetxferError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SOURCE_FILE_BYTES
                ),
            )));
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(SourceFile { name, bytes })
    }

    pub fn format(&self) -> Option<SourceFormat> {
        SourceFormat::from_file_name(&self.name)
    }
}

/// Decode a file into its sheets, in workbook order.
pub fn decode(file: &SourceFile) -> Result<Vec<(String, Grid)>> {
    match file.format() {
        Some(SourceFormat::Csv) => {
            let grid = decode_csv(&file.bytes)?;
            Ok(vec![(CSV_SHEET_NAME.to_string(), grid)])
        }
        Some(SourceFormat::Xlsx | SourceFormat::Xls) => decode_spreadsheet(&file.name, &file.bytes),
        None => Err(SheetxferError::UnsupportedFormat(file.name.clone())),
    }
}

/// The file name an export of `name` is written under.
pub fn export_file_name(name: &str) -> String {
    match SourceFormat::from_file_name(name) {
        Some(format) => {
            let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
            format!("{}.{}", stem, format.export_extension())
        }
        None => format!("{}.xlsx", name),
    }
}

/// Encode a workbook for download. Returns the file name and bytes.
pub fn encode(workbook: &Workbook) -> Result<(String, Vec<u8>)> {
    let file_name = export_file_name(workbook.name());
    let bytes = match SourceFormat::from_file_name(&file_name) {
        Some(SourceFormat::Csv) => {
            let grid = workbook.sheets().first().map(|s| &s.grid);
            encode_csv(grid.unwrap_or(&Grid::new()))
        }
        _ => encode_xlsx(workbook)?,
    };
    Ok((file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetxfer_engine::engine::CellValue;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(SourceFormat::from_file_name("a.XLSX"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_file_name("b.Xls"), Some(SourceFormat::Xls));
        assert_eq!(SourceFormat::from_file_name("c.d.csv"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_file_name("notes.txt"), None);
        assert_eq!(SourceFormat::from_file_name("xlsx"), None);
        assert_eq!(SourceFormat::from_file_name("report.xlsm"), None);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Report.xlsx"), "Report.xlsx");
        assert_eq!(export_file_name("old.XLS"), "old.xlsx");
        assert_eq!(export_file_name("data.csv"), "data.csv");
        assert_eq!(export_file_name("unnamed"), "unnamed.xlsx");
    }

    #[test]
    fn test_decode_rejects_unknown_suffix() {
        let file = SourceFile::new("notes.txt", b"a,b".to_vec());
        assert!(matches!(
            decode(&file),
            Err(SheetxferError::UnsupportedFormat(name)) if name == "notes.txt"
        ));
    }

    #[test]
    fn test_decode_csv_names_single_sheet() {
        let file = SourceFile::new("scores.csv", b"Name,Score\nA,10\n".to_vec());
        let sheets = decode(&file).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].0, CSV_SHEET_NAME);
        assert_eq!(sheets[0].1.cell(1, 1), Some(&CellValue::Number(10.0)));
    }

    #[test]
    fn test_encode_csv_workbook_writes_first_sheet() {
        let wb = Workbook::new(
            "out.csv",
            vec![
                ("A".to_string(), Grid::from_rows(vec![vec![CellValue::Number(1.0)]])),
                ("B".to_string(), Grid::from_rows(vec![vec![CellValue::Number(2.0)]])),
            ],
        );
        let (name, bytes) = encode(&wb).unwrap();
        assert_eq!(name, "out.csv");
        assert_eq!(String::from_utf8(bytes).unwrap(), "1\n");
    }

    #[test]
    fn test_encode_decode_xlsx_round_trip() {
        let grid = Grid::from_rows(vec![
            vec![CellValue::text("Name"), CellValue::text("Score")],
            vec![CellValue::text("A"), CellValue::Number(10.5)],
        ]);
        let wb = Workbook::new("book.xlsx", vec![("Data".to_string(), grid.clone())]);
        let (name, bytes) = encode(&wb).unwrap();
        assert_eq!(name, "book.xlsx");

        let sheets = decode(&SourceFile::new(name, bytes)).unwrap();
        assert_eq!(sheets, vec![("Data".to_string(), grid)]);
    }
}
