//! Parser for the per-field constraint tag mini-language.
//!
//! A field declares its constraints as `layout:"key1:value1,key2,..."`.
//! Keys are case-insensitive and unknown keys are ignored; values are
//! trimmed. The parse is a pure function of the tag string.

use regex::Regex;
use thiserror::Error;

/// Prefix marker introducing the quoted constraint list.
pub(crate) const TAG_MARKER: &str = "layout:";

/// Definitional errors raised while parsing a constraint tag.
/// These abort the parse for the field; no partial tag is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum TagError {
    #[error("no \"layout\" tag found")]
    NoFieldTag,

    #[error("empty \"layout\" tag found")]
    EmptyFieldTag,

    #[error("expected value for \"column\" tag entry")]
    MissingColumnValue,

    #[error("expected value for \"regex\" tag entry")]
    MissingRegexValue,

    #[error("expected value for \"max\" tag entry")]
    MissingMaxValue,

    #[error("expected value for \"min\" tag entry")]
    MissingMinValue,

    #[error("expected value for \"maxLength\" tag entry")]
    MissingMaxLengthValue,

    #[error("expected value for \"minLength\" tag entry")]
    MissingMinLengthValue,

    #[error("the \"max\" value should be greater than the \"min\" value")]
    InvalidMaxMin,

    #[error("the \"maxLength\" value should be greater than the \"minLength\" value")]
    InvalidMaxMinLength,

    #[error("invalid regex value")]
    InvalidRegex,
}

/// Parsed constraint set of a single field.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct FieldTag {
    /// Column letter reference, upper-cased (empty when not declared)
    pub(crate) column: String,
    /// Field holds a comma-separated list of values
    pub(crate) comma_separated: bool,
    /// Value must be a syntactically valid email address
    pub(crate) email: bool,
    /// Value must be non-empty
    pub(crate) required: bool,
    /// Pattern the value must match
    pub(crate) regex: Option<String>,
    /// Upper numeric bound, inclusive
    pub(crate) max: Option<f64>,
    /// Lower numeric bound, inclusive
    pub(crate) min: Option<f64>,
    /// Upper length bound, inclusive
    pub(crate) max_length: Option<i64>,
    /// Lower length bound, inclusive
    pub(crate) min_length: Option<i64>,
    /// Value must be a syntactically valid absolute URL
    pub(crate) url: bool,
    /// Column participates in the session uniqueness index
    pub(crate) unique: bool,
}

impl FieldTag {
    /// Parses a raw field annotation into a constraint set.
    ///
    /// The annotation must contain the `layout:` marker followed by a
    /// double-quoted, comma-separated list of `key[:value]` entries.
    pub(crate) fn parse(source: &str) -> Result<FieldTag, TagError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(TagError::NoFieldTag);
        }
        let start = source.find(TAG_MARKER).ok_or(TagError::NoFieldTag)?;

        let rest = &source[start + TAG_MARKER.len()..];
        if rest.is_empty() {
            return Err(TagError::EmptyFieldTag);
        }
        let open = rest.find('"').ok_or(TagError::EmptyFieldTag)?;
        let rest = &rest[open + 1..];
        let close = rest.find('"').ok_or(TagError::EmptyFieldTag)?;
        let body = rest[..close].trim();
        if body.is_empty() {
            return Err(TagError::EmptyFieldTag);
        }

        let mut tag = FieldTag::default();
        for entry in body.split(',') {
            let (key, value) = match entry.split_once(':') {
                Some((key, value)) => (key, value.trim()),
                None => (entry, ""),
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "column" => {
                    if value.is_empty() {
                        return Err(TagError::MissingColumnValue);
                    }
                    tag.column = value.to_ascii_uppercase();
                }
                "commaseparatedvalue" => tag.comma_separated = true,
                "regex" => {
                    if value.is_empty() {
                        return Err(TagError::MissingRegexValue);
                    }
                    tag.regex = Some(value.to_owned());
                }
                "email" => tag.email = true,
                "required" => tag.required = true,
                "max" => {
                    if value.is_empty() {
                        return Err(TagError::MissingMaxValue);
                    }
                    tag.max = Some(value.parse().unwrap_or_default());
                }
                "min" => {
                    if value.is_empty() {
                        return Err(TagError::MissingMinValue);
                    }
                    tag.min = Some(value.parse().unwrap_or_default());
                }
                "maxlength" => {
                    if value.is_empty() {
                        return Err(TagError::MissingMaxLengthValue);
                    }
                    tag.max_length = Some(value.parse().unwrap_or_default());
                }
                "minlength" => {
                    if value.is_empty() {
                        return Err(TagError::MissingMinLengthValue);
                    }
                    tag.min_length = Some(value.parse().unwrap_or_default());
                }
                "url" => tag.url = true,
                "unique" => tag.unique = true,
                _ => {} // unrecognized keys are ignored
            }
        }

        if let Some(pattern) = &tag.regex {
            if Regex::new(pattern).is_err() {
                return Err(TagError::InvalidRegex);
            }
        }
        if let (Some(max), Some(min)) = (tag.max, tag.min) {
            if max < min {
                return Err(TagError::InvalidMaxMin);
            }
        }
        if let (Some(max), Some(min)) = (tag.max_length, tag.min_length) {
            if max < min {
                return Err(TagError::InvalidMaxMinLength);
            }
        }

        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::tag::FieldTag;
    use crate::layout::tag::TagError;

    #[test]
    fn parse_all_keys() {
        let tag = FieldTag::parse(
            r#"layout:"column:a,required,commaSeparatedValue,email,url,unique,regex:^\d+$,min:1,max:10,minLength:2,maxLength:8""#,
        )
        .unwrap();

        assert_eq!(tag.column, "A");
        assert!(tag.required);
        assert!(tag.comma_separated);
        assert!(tag.email);
        assert!(tag.url);
        assert!(tag.unique);
        assert_eq!(tag.regex.as_deref(), Some(r"^\d+$"));
        assert_eq!(tag.min, Some(1.0));
        assert_eq!(tag.max, Some(10.0));
        assert_eq!(tag.min_length, Some(2));
        assert_eq!(tag.max_length, Some(8));
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let tag = FieldTag::parse(r#"layout:"column:B,nonsense,other:value""#).unwrap();
        assert_eq!(tag.column, "B");
        assert!(!tag.required);
    }

    #[test]
    fn parse_marker_is_found_anywhere() {
        let tag = FieldTag::parse(r#"serde:"rename" layout:"column:C""#).unwrap();
        assert_eq!(tag.column, "C");
    }

    #[test]
    fn missing_marker() {
        assert_eq!(FieldTag::parse(""), Err(TagError::NoFieldTag));
        assert_eq!(FieldTag::parse("   "), Err(TagError::NoFieldTag));
        assert_eq!(
            FieldTag::parse(r#"json:"column:A""#),
            Err(TagError::NoFieldTag)
        );
    }

    #[test]
    fn empty_body() {
        assert_eq!(FieldTag::parse("layout:"), Err(TagError::EmptyFieldTag));
        assert_eq!(FieldTag::parse(r#"layout:"""#), Err(TagError::EmptyFieldTag));
        assert_eq!(
            FieldTag::parse(r#"layout:"   ""#),
            Err(TagError::EmptyFieldTag)
        );
        assert_eq!(
            FieldTag::parse("layout:no-quotes"),
            Err(TagError::EmptyFieldTag)
        );
    }

    #[test]
    fn missing_values() {
        assert_eq!(
            FieldTag::parse(r#"layout:"column:""#),
            Err(TagError::MissingColumnValue)
        );
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,regex:""#),
            Err(TagError::MissingRegexValue)
        );
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,max:""#),
            Err(TagError::MissingMaxValue)
        );
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,min:""#),
            Err(TagError::MissingMinValue)
        );
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,maxLength:""#),
            Err(TagError::MissingMaxLengthValue)
        );
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,minLength:""#),
            Err(TagError::MissingMinLengthValue)
        );
    }

    #[test]
    fn inconsistent_bounds() {
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,min:10,max:5""#),
            Err(TagError::InvalidMaxMin)
        );
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,minLength:10,maxLength:5""#),
            Err(TagError::InvalidMaxMinLength)
        );
        // Equal bounds are consistent
        assert!(FieldTag::parse(r#"layout:"column:A,min:5,max:5""#).is_ok());
    }

    #[test]
    fn invalid_regex() {
        assert_eq!(
            FieldTag::parse(r#"layout:"column:A,regex:[""#),
            Err(TagError::InvalidRegex)
        );
    }

    #[test]
    fn column_is_upper_cased() {
        let tag = FieldTag::parse(r#"layout:"column:aa""#).unwrap();
        assert_eq!(tag.column, "AA");
    }
}
