//! Decoding of remote payloads into the canonical model.
//!
//! # Responsibility
//! - Accept snake_case or camelCase field names, bare or `{ "data": ... }`
//!   enveloped payloads, and nested or flat collections.
//! - Produce exactly one typed shape per entity kind at the boundary.
//!
//! # Invariants
//! - Decoding never mutates its input.
//! - Missing optional fields decode to `None` or an empty list.
//! - Structurally unusable payloads are rejected, never widened.
//! - Decoding a serialized canonical value yields the same value.

mod entities;
pub mod fields;

pub use entities::{
    normalize_agenda, normalize_day, normalize_days, normalize_programme, normalize_session,
    normalize_speaker, normalize_speakers, normalize_time_slot, normalize_time_slots,
};

use crate::model::EntityKind;
use serde_json::Value;
use thiserror::Error;

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Payload shape rejected by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{kind} payload must be a JSON object")]
    NotAnObject { kind: EntityKind },
    #[error("{kind} payload is missing required field `{field}`")]
    MissingField {
        kind: EntityKind,
        field: &'static str,
    },
    #[error("{kind} field `{field}` has invalid value {value}")]
    InvalidField {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },
    #[error("{kind} payload nests `{field}` directly instead of under `{expected}`")]
    MisplacedChildren {
        kind: EntityKind,
        field: &'static str,
        expected: &'static str,
    },
    #[error("{kind} list payload must be an array or a `data` envelope around one, got {found}")]
    NotAList { kind: EntityKind, found: String },
}

/// Returns the payload inside a `{ "data": ... }` envelope, or the value itself.
pub fn unwrap_envelope(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => value,
    }
}

/// Returns the items of a bare array or of an array inside a `data` envelope.
pub fn unwrap_list_envelope(value: &Value, kind: EntityKind) -> NormalizeResult<&[Value]> {
    if let Value::Array(items) = value {
        return Ok(items.as_slice());
    }
    match value.get("data") {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        _ => Err(NormalizeError::NotAList {
            kind,
            found: json_kind(value).to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{unwrap_envelope, unwrap_list_envelope, NormalizeError};
    use crate::model::EntityKind;
    use serde_json::json;

    #[test]
    fn unwrap_envelope_accepts_bare_and_wrapped_payloads() {
        let bare = json!({"id": 1});
        let wrapped = json!({"data": {"id": 1}});
        assert_eq!(unwrap_envelope(&bare), &json!({"id": 1}));
        assert_eq!(unwrap_envelope(&wrapped), &json!({"id": 1}));
    }

    #[test]
    fn unwrap_list_envelope_rejects_non_list_shapes() {
        let wrapped = json!({"data": [{"id": 1}]});
        assert_eq!(
            unwrap_list_envelope(&wrapped, EntityKind::Day)
                .expect("wrapped list should unwrap")
                .len(),
            1
        );

        let err = unwrap_list_envelope(&json!({"data": {"id": 1}}), EntityKind::Day)
            .expect_err("object payload is not a list");
        assert!(matches!(err, NormalizeError::NotAList { .. }));
    }
}
