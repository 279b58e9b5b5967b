//! Scalar coercion: remote string → typed JSON value.
//!
//! Remote payloads carry every scalar as text, decorated in ways standard
//! parsers reject: `--` placeholders for missing values, percentages, and
//! bucketed ratios such as `> 90%`. [`pre_hook`] rewrites those before the
//! type-specific parse.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::borrow::Cow;
use sync_core::{Schema, SemanticType};

/// Error for a scalar that cannot be parsed as its declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Failed to parse '{value}' as {expected_type}: {message}")]
pub struct ParseError {
    pub message: String,
    pub value: String,
    pub expected_type: String,
}

impl ParseError {
    fn new(value: &str, expected_type: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        }
    }
}

/// Rewrite remote sentinels ahead of parsing.
///
/// Returns `None` when the value stands for a present-but-null value.
///
/// - any value containing `--` is null, whatever the field type
/// - for `number` fields: `> 90%` → `90.01`, `< 10%` → `9.99`, a trailing
///   ` x` is dropped and every `%` is removed
pub fn pre_hook(value: &str, semantic: SemanticType) -> Option<Cow<'_, str>> {
    if value.contains("--") {
        return None;
    }

    if value.is_empty() || semantic != SemanticType::Number {
        return Some(Cow::Borrowed(value));
    }

    let mut value = match value {
        "> 90%" => "90.01",
        "< 10%" => "9.99",
        other => other,
    };
    if let Some(stripped) = value.strip_suffix(" x") {
        value = stripped;
    }

    if value.contains('%') {
        Some(Cow::Owned(value.replace('%', "")))
    } else {
        Some(Cow::Borrowed(value))
    }
}

/// Coerce a remote scalar into the JSON value its schema declares.
pub fn coerce_scalar(value: &str, schema: &Schema) -> Result<serde_json::Value, ParseError> {
    let semantic = schema.semantic_type();

    let Some(value) = pre_hook(value, semantic) else {
        return Ok(serde_json::Value::Null);
    };

    if value.is_empty() && schema.is_nullable() {
        return Ok(serde_json::Value::Null);
    }

    match semantic {
        SemanticType::String => Ok(serde_json::Value::String(value.into_owned())),
        SemanticType::Integer => parse_integer(&value).map(serde_json::Value::from),
        SemanticType::Number => parse_number(&value),
        SemanticType::Boolean => Ok(serde_json::Value::Bool(parse_boolean(&value))),
        SemanticType::DateTime => parse_date_time(&value)
            .and_then(|secs| format_date_time(secs).ok_or_else(|| {
                ParseError::new(&value, "date-time", "timestamp out of range")
            }))
            .map(serde_json::Value::String),
        SemanticType::Object | SemanticType::Array => Err(ParseError::new(
            &value,
            if semantic == SemanticType::Object {
                "object"
            } else {
                "array"
            },
            "expected a structured value, found text",
        )),
    }
}

fn parse_integer(value: &str) -> Result<i64, ParseError> {
    let cleaned = value.trim().replace(',', "");
    if let Ok(i) = cleaned.parse::<i64>() {
        return Ok(i);
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(ParseError::new(value, "integer", "invalid integer")),
    }
}

fn parse_number(value: &str) -> Result<serde_json::Value, ParseError> {
    let cleaned = value.trim().replace(',', "");
    cleaned
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .ok_or_else(|| ParseError::new(value, "number", "invalid number"))
}

/// `false` in any case is false; any other non-empty text is true.
fn parse_boolean(value: &str) -> bool {
    !value.eq_ignore_ascii_case("false") && !value.is_empty()
}

/// Parse a remote date or timestamp into seconds since the Unix epoch.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, `YYYYMMDD`, and
/// integer epoch seconds. Zone-less values are read as UTC.
pub fn parse_date_time(value: &str) -> Result<i64, ParseError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt).timestamp());
    }
    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&midnight).timestamp());
            }
        }
    }
    value
        .parse::<i64>()
        .map_err(|_| ParseError::new(value, "date-time", "unrecognized date format"))
}

/// Render epoch seconds as the canonical emitted timestamp.
pub fn format_date_time(secs: i64) -> Option<String> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S.000000Z").to_string())
}
