//! Batch orchestration: turning a workbook (or in-memory rows) into a
//! session full of typed records.

use crate::error::LayoutError;
use crate::layout::session::Session;
use crate::layout::RecordLayout;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use std::path::Path;

/// Reads the first sheet of a workbook into the session.
///
/// Fails immediately when the workbook cannot be opened, has no sheet, or
/// the sheet cannot be read. Row-level validation failures do not abort the
/// batch; see [`read_rows`].
pub fn read_file<P>(
    layout: &RecordLayout,
    path: P,
    session: &mut Session,
) -> Result<(), LayoutError>
where
    P: AsRef<Path>,
{
    let mut spreadsheet = Spreadsheet::open(path)?;
    let sheet_name = spreadsheet
        .sheet_names()
        .into_iter()
        .next()
        .ok_or(SpreadsheetError::SheetNotFound)?;
    let rows = spreadsheet.read_rows(&sheet_name)?;
    tracing::debug!(sheet = %sheet_name, rows = rows.len(), "loaded sheet");
    read_rows(layout, &rows, session)
}

/// Converts a batch of raw rows into records, accumulating them in the
/// session.
///
/// Row 1 is the header and is never converted; data rows get 1-based
/// indexes starting at 2. Every produced record is retained, error-bearing
/// rows included, and every row is processed even after a failure. Returns
/// [`LayoutError::ValidationFail`] when any row produced errors.
pub fn read_rows(
    layout: &RecordLayout,
    rows: &[Vec<String>],
    session: &mut Session,
) -> Result<(), LayoutError> {
    let mut has_errors = false;
    for (index, cells) in rows.iter().enumerate().skip(1) {
        let mut record = layout.record();
        record.index = index + 1;
        let errors = layout.populate(&mut record, cells, session);
        if !errors.is_empty() {
            has_errors = true;
            session.push_errors(errors);
        }
        session.push_record(record);
    }
    if has_errors {
        Err(LayoutError::ValidationFail)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LayoutError;
    use crate::layout::rules::RuleError;
    use crate::layout::session::Session;
    use crate::layout::FieldKind;
    use crate::layout::FieldValue;
    use crate::layout::RecordLayout;
    use crate::reader::read_file;
    use crate::reader::read_rows;

    fn sample_layout() -> RecordLayout {
        RecordLayout::new()
            .field("ID", FieldKind::Integer, r#"layout:"column:A,required,min:1""#)
            .field("Name", FieldKind::Text, r#"layout:"column:B,required""#)
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn skips_header_and_assigns_indexes() {
        let layout = sample_layout();
        let mut session = Session::new();
        let rows = vec![
            row(&["ID", "Name"]),
            row(&["1", "Alice"]),
            row(&["2", "Bob"]),
        ];

        assert!(read_rows(&layout, &rows, &mut session).is_ok());

        assert_eq!(session.count_rows(), 2);
        assert_eq!(session.records()[0].index, 2);
        assert_eq!(session.records()[1].index, 3);
        assert_eq!(
            layout.get(&session.records()[1], "Name"),
            Some(&FieldValue::Text("Bob".to_owned()))
        );
    }

    #[test]
    fn failing_rows_flag_the_batch_but_are_retained() {
        let layout = sample_layout();
        let mut session = Session::new();
        let rows = vec![
            row(&["ID", "Name"]),
            row(&["0", "Alice"]),
            row(&["2", "Bob"]),
        ];

        let result = read_rows(&layout, &rows, &mut session);

        assert!(matches!(result, Err(LayoutError::ValidationFail)));
        assert_eq!(session.count_rows(), 2);
        assert_eq!(session.errors().len(), 1);
        assert_eq!(session.errors()[0].row, 2);
        assert_eq!(session.errors()[0].column, "A");
        assert_eq!(session.errors()[0].kind, RuleError::MinValue);
    }

    #[test]
    fn header_only_or_empty_input_produces_nothing() {
        let layout = sample_layout();
        let mut session = Session::new();

        assert!(read_rows(&layout, &[], &mut session).is_ok());
        assert!(read_rows(&layout, &[row(&["ID", "Name"])], &mut session).is_ok());
        assert_eq!(session.count_rows(), 0);
        assert!(session.errors().is_empty());
    }

    #[test]
    fn read_file_rejects_unknown_formats() {
        let layout = sample_layout();
        let mut session = Session::new();
        assert!(read_file(&layout, "records.txt", &mut session).is_err());
        assert_eq!(session.count_rows(), 0);
    }
}
