//! Batch-scoped accumulator state.

use crate::layout::Record;
use crate::layout::ValidationError;
use std::collections::HashMap;

/// Mutable state for one batch of rows: the uniqueness index, the
/// accumulated validation errors and the produced records.
///
/// A session must not be reused across unrelated batches without calling
/// [`Session::reset`], or uniqueness state leaks from one file into the
/// next. It holds no internal synchronization; use one session per batch.
#[derive(Debug, Default)]
pub struct Session {
    /// Columns already claimed by a `unique` field, keyed by column
    /// reference only, mapped to the first claiming row
    uniques: HashMap<String, usize>,
    errors: Vec<ValidationError>,
    records: Vec<Record>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records produced by the batch, error-bearing rows included.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// All validation errors accumulated over the batch.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Number of records produced by the batch.
    pub fn count_rows(&self) -> usize {
        self.records.len()
    }

    /// Clears all state so the session can host a new batch.
    pub fn reset(&mut self) {
        self.uniques.clear();
        self.errors.clear();
        self.records.clear();
    }

    /// Claims a column for the given row. Returns false when the column was
    /// already claimed by an earlier row; the claim is by column reference
    /// only, not by value.
    pub(crate) fn claim_column(&mut self, column: &str, row: usize) -> bool {
        if self.uniques.contains_key(column) {
            false
        } else {
            self.uniques.insert(column.to_owned(), row);
            true
        }
    }

    pub(crate) fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub(crate) fn push_errors(&mut self, errors: Vec<ValidationError>) {
        self.errors.extend(errors);
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::rules::RuleError;
    use crate::layout::session::Session;
    use crate::layout::ValidationError;

    #[test]
    fn claim_column_is_first_come_first_served() {
        let mut session = Session::new();
        assert!(session.claim_column("A", 2));
        assert!(!session.claim_column("A", 3));
        assert!(session.claim_column("B", 3));
    }

    #[test]
    fn reset_clears_all_state() {
        let mut session = Session::new();
        session.claim_column("A", 2);
        session.push_errors(vec![ValidationError {
            row: 2,
            column: "A".to_owned(),
            kind: RuleError::Required,
        }]);

        session.reset();

        assert!(session.claim_column("A", 2));
        assert!(session.errors().is_empty());
        assert_eq!(session.count_rows(), 0);
    }
}
