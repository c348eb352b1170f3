//! # Record Layout Module
//!
//! Binds rows of raw text cells to strongly-typed records. A
//! [`RecordLayout`] describes the target shape: an ordered list of named
//! fields, each with a semantic kind and a declarative constraint tag.
//! [`RecordLayout::populate`] converts one row of cells into a record under
//! those constraints, and [`RecordLayout::validate`] re-checks an
//! already-populated record outside any row context.

pub(crate) mod message;
pub(crate) mod rules;
pub(crate) mod session;
pub(crate) mod tag;

use crate::layout::rules::RuleError;
use crate::layout::session::Session;
use crate::layout::tag::FieldTag;
use crate::layout::tag::TagError;
use crate::spreadsheet::reference::col_to_index;

/// Semantic kind of a field: a scalar or a comma-separated list of scalars.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    TextList,
    IntegerList,
    DecimalList,
}

impl FieldKind {
    /// Default value a field holds before (or instead of) population.
    pub(crate) fn default_value(&self) -> FieldValue {
        match self {
            Self::Text => FieldValue::Text(String::new()),
            Self::Integer => FieldValue::Integer(0),
            Self::Decimal => FieldValue::Decimal(0.0),
            Self::TextList => FieldValue::TextList(Vec::new()),
            Self::IntegerList => FieldValue::IntegerList(Vec::new()),
            Self::DecimalList => FieldValue::DecimalList(Vec::new()),
        }
    }
}

/// A typed field value held by a record.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    TextList(Vec<String>),
    IntegerList(Vec<i64>),
    DecimalList(Vec<f64>),
}

impl FieldValue {
    /// Renders the value to its canonical text form: scalars through
    /// `to_string`, lists joined with `","`. This is the form
    /// self-validation feeds back through the rule evaluators; decimal
    /// rendering uses the shortest round-trippable representation, so exact
    /// float round-trips are not guaranteed.
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.to_owned(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::TextList(values) => values.join(","),
            Self::IntegerList(values) => join(values),
            Self::DecimalList(values) => join(values),
        }
    }

    /// Extracts the text value if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Extracts the integer value if this is an integer field.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Extracts the decimal value if this is a decimal field.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Extracts the element slice if this is a text list field.
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            Self::TextList(values) => Some(values),
            _ => None,
        }
    }

    /// Extracts the element slice if this is an integer list field.
    pub fn as_integer_list(&self) -> Option<&[i64]> {
        match self {
            Self::IntegerList(values) => Some(values),
            _ => None,
        }
    }

    /// Extracts the element slice if this is a decimal list field.
    pub fn as_decimal_list(&self) -> Option<&[f64]> {
        match self {
            Self::DecimalList(values) => Some(values),
            _ => None,
        }
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(T::to_string)
        .collect::<Vec<String>>()
        .join(",")
}

/// One failed rule or conversion, positioned by row and column.
/// Row index 0 denotes a record validated outside row context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub row: usize,
    pub column: String,
    pub kind: RuleError,
}

/// A registered field: name, kind, and its constraint tag parsed once at
/// registration. A failed parse is kept so the field can be skipped at
/// population time, matching per-visit parse behavior.
#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    kind: FieldKind,
    tag: Result<FieldTag, TagError>,
}

/// Ordered schema describing one row's target shape.
///
/// Built by chaining [`RecordLayout::field`] registrations; the field order
/// fixes the value positions of every [`Record`] the layout instantiates.
#[derive(Debug, Default, Clone)]
pub struct RecordLayout {
    fields: Vec<FieldSpec>,
}

/// A typed record produced from (or validated against) a layout.
#[derive(Debug, Clone)]
pub struct Record {
    /// 1-based source row (header row = 1, first data row = 2);
    /// 0 when the record was not sourced from a row
    pub index: usize,
    values: Vec<FieldValue>,
}

impl Record {
    /// All field values, in layout registration order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Value at a field position.
    pub fn value(&self, position: usize) -> Option<&FieldValue> {
        self.values.get(position)
    }
}

impl RecordLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field with its constraint tag, e.g.
    /// `layout.field("Age", FieldKind::Integer, r#"layout:"column:F,required,min:18""#)`.
    /// The tag is parsed here, once per layout.
    pub fn field(mut self, name: &str, kind: FieldKind, tag: &str) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_owned(),
            kind,
            tag: FieldTag::parse(tag),
        });
        self
    }

    /// Instantiates a record with every field at its default value.
    pub fn record(&self) -> Record {
        Record {
            index: 0,
            values: self
                .fields
                .iter()
                .map(|field| field.kind.default_value())
                .collect(),
        }
    }

    /// Position of a field by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Value of a named field in the given record.
    pub fn get<'a>(&self, record: &'a Record, name: &str) -> Option<&'a FieldValue> {
        record.values.get(self.position(name)?)
    }

    /// Replaces the value of a named field. Returns false when the layout
    /// has no such field.
    pub fn set(&self, record: &mut Record, name: &str, value: FieldValue) -> bool {
        let position = match self.position(name) {
            Some(position) => position,
            None => return false,
        };
        match record.values.get_mut(position) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Binds one row of raw cells to the record's fields.
    ///
    /// Per field: a malformed constraint tag or an unresolvable/out-of-bounds
    /// column reference skips the field silently, leaving its default value;
    /// otherwise the cell text is run through the rule evaluators, writing
    /// the converted value on success and producing a [`ValidationError`]
    /// carrying the record's row index on failure. Fields tagged `unique`
    /// claim their column in the session index; a column already claimed by
    /// an earlier row yields a `NotUnique` error regardless of the value.
    ///
    /// Returns the errors produced for this row; empty means the record is
    /// error-free.
    pub fn populate(
        &self,
        record: &mut Record,
        cells: &[String],
        session: &mut Session,
    ) -> Vec<ValidationError> {
        let row = record.index;
        let mut errors = Vec::new();
        for (position, field) in self.fields.iter().enumerate() {
            let tag = match &field.tag {
                Ok(tag) => tag,
                Err(error) => {
                    tracing::warn!(field = %field.name, %error, "field skipped, malformed layout tag");
                    continue;
                }
            };
            let column = match col_to_index(&tag.column) {
                Some(column) => column,
                None => continue,
            };
            let raw = match cells.get(column) {
                Some(raw) => raw,
                None => continue,
            };

            let (value, failures) = rules::evaluate(field.kind, raw, tag);
            if let (Some(slot), Some(value)) = (record.values.get_mut(position), value) {
                *slot = value;
            }
            errors.extend(failures.into_iter().map(|kind| ValidationError {
                row,
                column: tag.column.clone(),
                kind,
            }));

            if tag.unique && !session.claim_column(&tag.column, row) {
                errors.push(ValidationError {
                    row,
                    column: tag.column.clone(),
                    kind: RuleError::NotUnique,
                });
            }
        }
        errors
    }

    /// Re-validates an already-populated record outside any row context.
    ///
    /// Each field's current value is rendered to canonical text and run
    /// through the same rule evaluators as [`RecordLayout::populate`], but
    /// nothing is written back, no cells are looked up, and no uniqueness
    /// bookkeeping happens. Errors carry row index 0.
    pub fn validate(&self, record: &Record) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (position, field) in self.fields.iter().enumerate() {
            let tag = match &field.tag {
                Ok(tag) => tag,
                Err(error) => {
                    tracing::warn!(field = %field.name, %error, "field skipped, malformed layout tag");
                    continue;
                }
            };
            let rendered = match record.values.get(position) {
                Some(value) => value.render(),
                None => continue,
            };

            let (_, failures) = rules::evaluate(field.kind, &rendered, tag);
            errors.extend(failures.into_iter().map(|kind| ValidationError {
                row: 0,
                column: tag.column.clone(),
                kind,
            }));
        }
        errors
    }
}
