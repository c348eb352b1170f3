use crate::spreadsheet::SpreadsheetError;
use thiserror::Error;

/// Top-level error type for batch operations.
///
/// Adapter failures are fatal to the whole batch; `ValidationFail` only
/// flags that some rows carried errors, and the session still holds every
/// produced record and the full error list.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("{0}")]
    Spreadsheet(#[from] SpreadsheetError),

    #[error("file rows validation fail")]
    ValidationFail,
}
