//! Convention-tolerant field readers over JSON objects.
//!
//! Every reader takes the snake_case field name, tries it first, then the
//! camelCase alias derived from it. `null` counts as absent.

use crate::model::ids::EntityId;
use crate::model::EntityKind;
use crate::normalize::{NormalizeError, NormalizeResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static SNAKE_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([a-z0-9])").expect("valid snake segment regex"));

const NAIVE_INSTANT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub type Object = Map<String, Value>;

/// Returns the camelCase alias of a snake_case field name.
pub fn camel_alias(snake: &str) -> String {
    SNAKE_SEGMENT_RE
        .replace_all(snake, |caps: &Captures<'_>| caps[1].to_ascii_uppercase())
        .into_owned()
}

pub fn as_object(value: &Value, kind: EntityKind) -> NormalizeResult<&Object> {
    value
        .as_object()
        .ok_or(NormalizeError::NotAnObject { kind })
}

/// Looks up `snake`, falling back to its camelCase alias.
pub fn field<'a>(object: &'a Object, snake: &str) -> Option<&'a Value> {
    match object.get(snake) {
        Some(value) if !value.is_null() => Some(value),
        _ => object
            .get(camel_alias(snake).as_str())
            .filter(|value| !value.is_null()),
    }
}

pub fn string_field(object: &Object, snake: &str) -> Option<String> {
    field(object, snake)
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub fn id_value(value: &Value) -> Option<EntityId> {
    match value {
        Value::String(text) => EntityId::parse(text),
        Value::Number(number) => EntityId::parse(&number.to_string()),
        Value::Object(object) => object.get("id").and_then(id_value),
        _ => None,
    }
}

pub fn id_field(object: &Object, snake: &str) -> Option<EntityId> {
    field(object, snake).and_then(id_value)
}

pub fn require_id(object: &Object, kind: EntityKind) -> NormalizeResult<EntityId> {
    id_field(object, "id").ok_or(NormalizeError::MissingField { kind, field: "id" })
}

/// Reads a list of ids; elements may be bare ids or objects carrying `id`.
pub fn id_list_field(
    object: &Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<Option<Vec<EntityId>>> {
    match field(object, snake) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.iter().filter_map(id_value).collect())),
        Some(other) => Err(invalid(kind, name, other)),
    }
}

pub fn object_list_field<'a>(
    object: &'a Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<&'a [Value]> {
    match field(object, snake) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(invalid(kind, name, other)),
    }
}

pub fn instant_field(
    object: &Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<Option<DateTime<Utc>>> {
    let Some(value) = field(object, snake) else {
        return Ok(None);
    };
    let text = value.as_str().ok_or_else(|| invalid(kind, name, value))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_instant(text)
        .map(Some)
        .ok_or_else(|| invalid(kind, name, value))
}

pub fn date_field(
    object: &Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<Option<NaiveDate>> {
    let Some(value) = field(object, snake) else {
        return Ok(None);
    };
    let text = value.as_str().ok_or_else(|| invalid(kind, name, value))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_date(text)
        .map(Some)
        .ok_or_else(|| invalid(kind, name, value))
}

/// Reads an integer that may arrive as a JSON number or numeric string.
pub fn integer_field(
    object: &Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<Option<i64>> {
    match field(object, snake) {
        None => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(kind, name, &Value::Number(number.clone()))),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(kind, name, &Value::String(text.clone()))),
        Some(other) => Err(invalid(kind, name, other)),
    }
}

pub fn count_field(
    object: &Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<Option<u32>> {
    match integer_field(object, snake, kind, name)? {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| NormalizeError::InvalidField {
                kind,
                field: name,
                value: value.to_string(),
            }),
    }
}

/// Reads a flag sent as a bool, `0`/`1`, or `"true"`/`"false"`.
pub fn flag_field(
    object: &Object,
    snake: &str,
    kind: EntityKind,
    name: &'static str,
) -> NormalizeResult<Option<bool>> {
    match field(object, snake) {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(invalid(kind, name, &Value::Number(number.clone()))),
        },
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(invalid(kind, name, &Value::String(text.clone()))),
        },
        Some(other) => Err(invalid(kind, name, other)),
    }
}

/// Parses RFC 3339 or a naive `YYYY-MM-DD[ T]HH:MM:SS` read as UTC.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }
    NAIVE_INSTANT_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Parses `YYYY-MM-DD` or takes the date part of an instant.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_instant(trimmed).map(|instant| instant.date_naive()))
}

fn invalid(kind: EntityKind, name: &'static str, value: &Value) -> NormalizeError {
    NormalizeError::InvalidField {
        kind,
        field: name,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{camel_alias, field, flag_field, id_value, parse_date, parse_instant};
    use crate::model::ids::EntityId;
    use crate::model::EntityKind;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn camel_alias_converts_each_segment() {
        assert_eq!(camel_alias("programme_day_id"), "programmeDayId");
        assert_eq!(camel_alias("title"), "title");
    }

    #[test]
    fn field_prefers_snake_case_and_skips_null() {
        let value = json!({"start_time": null, "startTime": "x", "end_time": "a", "endTime": "b"});
        let object = value.as_object().expect("fixture is an object");
        assert_eq!(field(object, "start_time"), Some(&json!("x")));
        assert_eq!(field(object, "end_time"), Some(&json!("a")));
        assert_eq!(field(object, "missing_field"), None);
    }

    #[test]
    fn id_value_accepts_numbers_strings_and_objects() {
        assert_eq!(id_value(&json!(12)), Some(EntityId::from("12")));
        assert_eq!(id_value(&json!("sp-1")), Some(EntityId::from("sp-1")));
        assert_eq!(id_value(&json!({"id": 3})), Some(EntityId::from("3")));
        assert_eq!(id_value(&json!("undefined")), None);
    }

    #[test]
    fn parse_instant_accepts_rfc3339_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        assert_eq!(parse_instant("2026-05-04T09:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2026-05-04T11:00:00+02:00"), Some(expected));
        assert_eq!(parse_instant("2026-05-04 09:00:00"), Some(expected));
        assert_eq!(parse_instant("09:00"), None);
    }

    #[test]
    fn parse_date_accepts_plain_and_instant_forms() {
        let expected = chrono::NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        assert_eq!(parse_date("2026-05-04"), Some(expected));
        assert_eq!(parse_date("2026-05-04T00:00:00Z"), Some(expected));
    }

    #[test]
    fn flag_field_accepts_numeric_flags() {
        let value = json!({"isPublished": 1});
        let object = value.as_object().expect("fixture is an object");
        let flag = flag_field(object, "is_published", EntityKind::Programme, "is_published")
            .expect("numeric flag should parse");
        assert_eq!(flag, Some(true));
    }
}
