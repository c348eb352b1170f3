//! Ordered validation rules and value coercion.
//!
//! Each scalar evaluator takes the raw cell text and a parsed constraint
//! set, runs its checks in a fixed order, and short-circuits on the first
//! failure. List-valued fields split the raw text on commas and evaluate
//! every element independently.

use crate::layout::tag::FieldTag;
use crate::layout::FieldKind;
use crate::layout::FieldValue;
use regex::Regex;
use thiserror::Error;
use url::Url;
use validator::ValidateEmail;

/// Rule or conversion failures recorded against a row and column.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleError {
    #[error("value required rule fail")]
    Required,

    #[error("min value rule fail")]
    MinValue,

    #[error("max value rule fail")]
    MaxValue,

    #[error("min length rule fail")]
    MinLength,

    #[error("max length rule fail")]
    MaxLength,

    #[error("url value rule validation fail")]
    Url,

    #[error("email value rule validation fail")]
    Email,

    #[error("regex matching rule fail")]
    RegexMatch,

    #[error("invalid regex value")]
    RegexInvalid,

    #[error("invalid integer value")]
    IntegerInvalid,

    #[error("invalid decimal value")]
    DecimalInvalid,

    #[error("invalid comma separated expected value")]
    CommaSeparatedInvalid,

    #[error("value is not unique")]
    NotUnique,

    #[error("the \"min\" tag entry is not allowed for text fields")]
    MinForbidden,

    #[error("the \"max\" tag entry is not allowed for text fields")]
    MaxForbidden,

    #[error("the \"minLength\" tag entry is not allowed for numeric fields")]
    MinLengthForbidden,

    #[error("the \"maxLength\" tag entry is not allowed for numeric fields")]
    MaxLengthForbidden,
}

/// Validates raw text against a text-kind constraint set.
/// Length, url, email and regex checks only apply to non-empty values;
/// length bounds are inclusive at both ends. Returns the trimmed text.
pub(crate) fn text_rules(raw: &str, tag: &FieldTag) -> Result<String, RuleError> {
    let value = raw.trim();
    if tag.required && value.is_empty() {
        return Err(RuleError::Required);
    }
    // Numeric bounds are a declaration mistake on a text field
    if tag.min.is_some() {
        return Err(RuleError::MinForbidden);
    }
    if tag.max.is_some() {
        return Err(RuleError::MaxForbidden);
    }
    if !value.is_empty() {
        if let Some(bound) = tag.min_length {
            if (value.len() as i64) < bound {
                return Err(RuleError::MinLength);
            }
        }
        if let Some(bound) = tag.max_length {
            if (value.len() as i64) > bound {
                return Err(RuleError::MaxLength);
            }
        }
        if tag.url && Url::parse(value).is_err() {
            return Err(RuleError::Url);
        }
        if tag.email && !value.validate_email() {
            return Err(RuleError::Email);
        }
        if let Some(pattern) = &tag.regex {
            let regex = Regex::new(pattern).map_err(|_| RuleError::RegexInvalid)?;
            if !regex.is_match(value) {
                return Err(RuleError::RegexMatch);
            }
        }
    }
    Ok(value.to_owned())
}

/// Validates raw text against an integer-kind constraint set and parses it
/// as a base-10 integer. Numeric bounds are inclusive at both ends.
pub(crate) fn integer_rules(raw: &str, tag: &FieldTag) -> Result<i64, RuleError> {
    let value = raw.trim();
    if tag.required && value.is_empty() {
        return Err(RuleError::Required);
    }
    // Length bounds are a declaration mistake on a numeric field
    if tag.min_length.is_some() {
        return Err(RuleError::MinLengthForbidden);
    }
    if tag.max_length.is_some() {
        return Err(RuleError::MaxLengthForbidden);
    }
    let parsed: i64 = value.parse().map_err(|_| RuleError::IntegerInvalid)?;
    if let Some(min) = tag.min {
        if parsed < min as i64 {
            return Err(RuleError::MinValue);
        }
    }
    if let Some(max) = tag.max {
        if parsed > max as i64 {
            return Err(RuleError::MaxValue);
        }
    }
    Ok(parsed)
}

/// Validates raw text against a decimal-kind constraint set and parses it
/// as a floating-point value. Numeric bounds are inclusive at both ends.
pub(crate) fn decimal_rules(raw: &str, tag: &FieldTag) -> Result<f64, RuleError> {
    let value = raw.trim();
    if tag.required && value.is_empty() {
        return Err(RuleError::Required);
    }
    if tag.min_length.is_some() {
        return Err(RuleError::MinLengthForbidden);
    }
    if tag.max_length.is_some() {
        return Err(RuleError::MaxLengthForbidden);
    }
    let parsed: f64 = value.parse().map_err(|_| RuleError::DecimalInvalid)?;
    if let Some(min) = tag.min {
        if parsed < min {
            return Err(RuleError::MinValue);
        }
    }
    if let Some(max) = tag.max {
        if parsed > max {
            return Err(RuleError::MaxValue);
        }
    }
    Ok(parsed)
}

/// Evaluates a raw cell value for a field of the given kind.
///
/// Scalar kinds produce either a converted value or a single failure.
/// List kinds route every comma-separated element to the matching scalar
/// evaluator; failing elements each contribute one failure without aborting
/// the rest, and the returned sequence keeps the successful elements in
/// input order (it may be shorter than the input).
pub(crate) fn evaluate(
    kind: FieldKind,
    raw: &str,
    tag: &FieldTag,
) -> (Option<FieldValue>, Vec<RuleError>) {
    match kind {
        FieldKind::Text => scalar(text_rules(raw, tag).map(FieldValue::Text)),
        FieldKind::Integer => scalar(integer_rules(raw, tag).map(FieldValue::Integer)),
        FieldKind::Decimal => scalar(decimal_rules(raw, tag).map(FieldValue::Decimal)),
        FieldKind::TextList | FieldKind::IntegerList | FieldKind::DecimalList => {
            if !tag.comma_separated {
                return (None, vec![RuleError::CommaSeparatedInvalid]);
            }
            let mut failures = Vec::new();
            let value = match kind {
                FieldKind::TextList => {
                    FieldValue::TextList(elements(raw, tag, &mut failures, text_rules))
                }
                FieldKind::IntegerList => {
                    FieldValue::IntegerList(elements(raw, tag, &mut failures, integer_rules))
                }
                _ => FieldValue::DecimalList(elements(raw, tag, &mut failures, decimal_rules)),
            };
            (Some(value), failures)
        }
    }
}

fn scalar(result: Result<FieldValue, RuleError>) -> (Option<FieldValue>, Vec<RuleError>) {
    match result {
        Ok(value) => (Some(value), Vec::new()),
        Err(error) => (None, vec![error]),
    }
}

/// Routes each comma-separated element through a scalar rule, collecting
/// successes in order and pushing one failure per failing element.
fn elements<T>(
    raw: &str,
    tag: &FieldTag,
    failures: &mut Vec<RuleError>,
    rule: impl Fn(&str, &FieldTag) -> Result<T, RuleError>,
) -> Vec<T> {
    let mut values = Vec::new();
    for element in raw.split(',') {
        match rule(element, tag) {
            Ok(value) => values.push(value),
            Err(error) => failures.push(error),
        }
    }
    values
}
