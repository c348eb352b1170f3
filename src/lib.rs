//! # Sheet Layout
//!
//! Converts rows of raw spreadsheet cells into strongly-typed records,
//! validating every value against a declarative per-column constraint tag
//! and reporting failures with row and column positions.
//!
//! ## Features
//!
//! - **Constraint tags**: per-field `layout:"column:A,required,min:1,..."`
//!   declarations covering presence, numeric and length bounds, url, email,
//!   pattern, list and uniqueness rules
//! - **Typed records**: text, integer, decimal and comma-separated list
//!   fields with per-kind defaults and canonical text rendering
//! - **Positioned errors**: every failed rule carries its 1-based row and
//!   column letter, plus a human-readable message table
//! - **Self-validation**: records built programmatically run through the
//!   same rules without any row context
//! - **Multi-format reading**: Excel (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`,
//!   `.xla`, `.xlam`) and OpenDocument (`.ods`) workbooks via a thin
//!   adapter; the engine itself only sees rows of text
//!
//! ## Example
//!
//! ```
//! use sheet_layout::{read_rows, FieldKind, RecordLayout, Session};
//!
//! let layout = RecordLayout::new()
//!     .field("ID", FieldKind::Integer, r#"layout:"column:A,required,min:1""#)
//!     .field("Name", FieldKind::Text, r#"layout:"column:B,required""#);
//!
//! let rows = vec![
//!     vec!["ID".to_string(), "Name".to_string()],
//!     vec!["1".to_string(), "Ada".to_string()],
//! ];
//!
//! let mut session = Session::new();
//! read_rows(&layout, &rows, &mut session).unwrap();
//! assert_eq!(session.count_rows(), 1);
//! ```

mod error;
mod layout;
mod reader;
mod spreadsheet;

pub use crate::error::LayoutError;
pub use crate::layout::message::error_message;
pub use crate::layout::rules::RuleError;
pub use crate::layout::session::Session;
pub use crate::layout::FieldKind;
pub use crate::layout::FieldValue;
pub use crate::layout::Record;
pub use crate::layout::RecordLayout;
pub use crate::layout::ValidationError;
pub use crate::reader::read_file;
pub use crate::reader::read_rows;
pub use crate::spreadsheet::Spreadsheet;
pub use crate::spreadsheet::SpreadsheetError;
