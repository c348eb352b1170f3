//! # Workbook Adapter Module
//!
//! Thin reading layer over the calamine spreadsheet readers. It opens a
//! workbook by file extension, lists its sheets, and yields each sheet as
//! rows of plain text cells addressed from `A1`, which is the only contract
//! the layout engine depends on.

pub(crate) mod reference;

use calamine::open_workbook;
use calamine::Data;
use calamine::Ods;
use calamine::OdsError;
use calamine::Reader;
use calamine::Xls;
use calamine::XlsError;
use calamine::Xlsb;
use calamine::XlsbError;
use calamine::Xlsx;
use calamine::XlsxError;
use chrono::NaiveDateTime;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors raised while opening or reading a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Error in Excel 2007+ format (.xlsx, .xlsm, .xlam)
    #[error("invalid xlsx file: {0}")]
    InvalidXlsxFile(#[from] XlsxError),

    /// Error in Excel Binary format (.xlsb)
    #[error("invalid xlsb file: {0}")]
    InvalidXlsbFile(#[from] XlsbError),

    /// Error in legacy Excel format (.xls, .xla)
    #[error("invalid xls file: {0}")]
    InvalidXlsFile(#[from] XlsError),

    /// Error in OpenDocument format (.ods)
    #[error("invalid ods file: {0}")]
    InvalidOdsFile(#[from] OdsError),

    /// Unsupported or unrecognized file extension
    #[error("cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },

    /// Workbook contains no sheet at all
    #[error("no sheet found on file")]
    SheetNotFound,
}

/// Type alias for buffered file reader
pub type FileReader = BufReader<File>;

/// Wrapper over the calamine readers for the supported workbook formats,
/// selected by file extension.
pub enum Spreadsheet {
    /// Excel 2007+ format reader (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Excel Binary format reader (.xlsb)
    Xlsb(Xlsb<FileReader>),
    /// Legacy Excel format reader (.xls, .xla)
    Xls(Xls<FileReader>),
    /// OpenDocument format reader (.ods)
    Ods(Ods<FileReader>),
}

impl Spreadsheet {
    /// Opens a workbook, detecting the format from the file extension.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the workbook file
    ///
    /// # Errors
    ///
    /// Returns an error when the extension is not recognized or the file
    /// cannot be opened as the detected format.
    pub fn open<P>(path: P) -> Result<Spreadsheet, SpreadsheetError>
    where
        P: AsRef<Path>,
    {
        match path.as_ref().extension().and_then(OsStr::to_str) {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xlsb") => Ok(Self::Xlsb(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            Some("ods") => Ok(Self::Ods(open_workbook(path)?)),
            _ => Err(SpreadsheetError::InvalidFileFormat {
                name: path.as_ref().to_string_lossy().to_string(),
            }),
        }
    }

    /// Names of all sheets in the workbook, in file order.
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Reads a sheet as rows of text cells addressed from `A1`.
    ///
    /// Calamine ranges start at the first used cell; rows and columns
    /// before the range start are padded with empty strings so that a
    /// column letter always resolves to the same cell index regardless of
    /// where the sheet's data begins.
    ///
    /// # Arguments
    ///
    /// * `sheet_name` - Name of the sheet to read
    ///
    /// # Errors
    ///
    /// Returns an error when the sheet cannot be read from the file.
    pub fn read_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>, SpreadsheetError> {
        let range = match self {
            Self::Xlsx(xlsx) => xlsx.worksheet_range(sheet_name)?,
            Self::Xlsb(xlsb) => xlsb.worksheet_range(sheet_name)?,
            Self::Xls(xls) => xls.worksheet_range(sheet_name)?,
            Self::Ods(ods) => ods.worksheet_range(sheet_name)?,
        };

        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![String::new(); col_offset];
            cells.extend(row.iter().map(data_to_text));
            rows.push(cells);
        }
        Ok(rows)
    }
}

/// Renders one cell to its text form.
///
/// Numbers and booleans use their canonical string representation;
/// date/time serials are formatted as time-only for serials within the
/// first day, date-only for integral serials, and full datetime otherwise;
/// ISO strings pass through; error cells render empty.
pub(crate) fn data_to_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(value) => value.to_owned(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| datetime_to_text(value.as_f64(), datetime))
            .unwrap_or_default(),
        Data::DateTimeIso(value) => value.to_owned(),
        Data::DurationIso(value) => value.to_owned(),
        Data::Error(_) => String::new(),
    }
}

/// Formats a date/time cell based on its serial value: times within the
/// first day have no date part, integral serials have no time part.
fn datetime_to_text(serial: f64, datetime: NaiveDateTime) -> String {
    if serial <= 1.0 {
        datetime.time().to_string()
    } else if serial.fract() == 0.0 {
        datetime.date().to_string()
    } else {
        datetime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::spreadsheet::data_to_text;
    use crate::spreadsheet::Spreadsheet;
    use crate::spreadsheet::SpreadsheetError;
    use calamine::CellErrorType;
    use calamine::Data;

    #[test]
    fn renders_plain_cells() {
        assert_eq!(data_to_text(&Data::Empty), "");
        assert_eq!(data_to_text(&Data::String("hello".to_owned())), "hello");
        assert_eq!(data_to_text(&Data::Int(42)), "42");
        assert_eq!(data_to_text(&Data::Float(2.5)), "2.5");
        assert_eq!(data_to_text(&Data::Bool(true)), "true");
        assert_eq!(
            data_to_text(&Data::DateTimeIso("2024-01-01".to_owned())),
            "2024-01-01"
        );
    }

    #[test]
    fn error_cells_render_empty() {
        assert_eq!(data_to_text(&Data::Error(CellErrorType::Div0)), "");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let result = Spreadsheet::open("records.txt");
        assert!(matches!(
            result,
            Err(SpreadsheetError::InvalidFileFormat { .. })
        ));
    }
}
