//! Outbound command payloads.
//!
//! Each request serializes only the fields of its own entity kind. Update
//! requests are partial: unset fields are omitted from the body.

use crate::model::ids::EntityId;
use crate::model::session::SessionType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDayRequest {
    pub event_id: EntityId,
    pub day_number: u32,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateDayRequest {
    pub fn new(event_id: impl Into<EntityId>, day_number: u32, date: NaiveDate) -> Self {
        Self {
            event_id: event_id.into(),
            day_number,
            date,
            title: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateDayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTimeSlotRequest {
    pub programme_day_id: EntityId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTimeSlotRequest {
    pub fn new(
        programme_day_id: impl Into<EntityId>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            programme_day_id: programme_day_id.into(),
            start_time,
            end_time,
            title: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTimeSlotRequest {
    /// Moves the slot to another day when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programme_day_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSessionRequest {
    pub time_slot_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programme_day_id: Option<EntityId>,
    pub title: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hall: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catering_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub panelist_ids: Vec<EntityId>,
}

impl CreateSessionRequest {
    pub fn new(
        time_slot_id: impl Into<EntityId>,
        title: impl Into<String>,
        session_type: SessionType,
    ) -> Self {
        Self {
            time_slot_id: time_slot_id.into(),
            programme_day_id: None,
            title: title.into(),
            session_type,
            description: None,
            location: None,
            hall: None,
            catering_notes: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            speaker_id: None,
            moderator_id: None,
            panelist_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSessionRequest {
    /// Moves the session to another slot when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hall: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catering_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panelist_ids: Option<Vec<EntityId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAgendaRequest {
    pub session_id: EntityId,
    pub title: String,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl CreateAgendaRequest {
    pub fn new(session_id: impl Into<EntityId>, title: impl Into<String>, order: i64) -> Self {
        Self {
            session_id: session_id.into(),
            title: title.into(),
            order,
            description: None,
            duration_minutes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateAgendaRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddParticipantRequest {
    pub speaker_id: EntityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateSpeakerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CreateSpeakerRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSpeakerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{CreateSessionRequest, UpdateSessionRequest};
    use crate::model::session::SessionType;
    use serde_json::json;

    #[test]
    fn session_payload_uses_wire_type_key() {
        let request = CreateSessionRequest::new("slot-1", "Opening", SessionType::Keynote);
        let body = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            body,
            json!({"time_slot_id": "slot-1", "title": "Opening", "type": "keynote"})
        );
    }

    #[test]
    fn partial_update_omits_unset_fields() {
        let request = UpdateSessionRequest {
            hall: Some("B".to_string()),
            ..UpdateSessionRequest::default()
        };
        let body = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(body, json!({"hall": "B"}));
    }
}
