//! Human-readable rendering of validation errors.

use crate::layout::rules::RuleError;
use crate::layout::ValidationError;

/// Renders a validation error as a human-readable sentence naming the
/// offending column. Pure mapping; the match is exhaustive over every
/// error kind, so the table is total by construction.
pub fn error_message(error: &ValidationError) -> String {
    let column = &error.column;
    match error.kind {
        RuleError::Required => {
            format!("The value of column \"{column}\" is required")
        }
        RuleError::MinValue => {
            format!("The value of column \"{column}\" is below the minimum allowed")
        }
        RuleError::MaxValue => {
            format!("The value of column \"{column}\" is above the maximum allowed")
        }
        RuleError::MinLength => {
            format!("The value of column \"{column}\" is shorter than allowed")
        }
        RuleError::MaxLength => {
            format!("The value of column \"{column}\" is longer than allowed")
        }
        RuleError::Url => {
            format!("The value of column \"{column}\" is not a valid URL")
        }
        RuleError::Email => {
            format!("The value of column \"{column}\" is not a valid email address")
        }
        RuleError::RegexMatch => {
            format!("The value of column \"{column}\" does not match the expected pattern")
        }
        RuleError::RegexInvalid => {
            format!("The pattern defined for column \"{column}\" is invalid")
        }
        RuleError::IntegerInvalid => {
            format!("The value of column \"{column}\" is not a valid integer")
        }
        RuleError::DecimalInvalid => {
            format!("The value of column \"{column}\" is not a valid decimal")
        }
        RuleError::CommaSeparatedInvalid => {
            format!("The value of column \"{column}\" cannot be assigned to a list")
        }
        RuleError::NotUnique => {
            format!("The value of column \"{column}\" must be unique per file")
        }
        RuleError::MinForbidden => {
            format!("Definition error on column \"{column}\": a minimum value cannot be used with text fields")
        }
        RuleError::MaxForbidden => {
            format!("Definition error on column \"{column}\": a maximum value cannot be used with text fields")
        }
        RuleError::MinLengthForbidden => {
            format!("Definition error on column \"{column}\": a minimum length cannot be used with numeric fields")
        }
        RuleError::MaxLengthForbidden => {
            format!("Definition error on column \"{column}\": a maximum length cannot be used with numeric fields")
        }
    }
}
