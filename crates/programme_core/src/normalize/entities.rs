//! Per-kind decoders.

use crate::model::ids::EntityId;
use crate::model::programme::{Day, Programme, TimeSlot};
use crate::model::session::{Agenda, Session, SessionType};
use crate::model::speaker::Speaker;
use crate::model::EntityKind;
use crate::normalize::fields::{
    as_object, count_field, date_field, field, flag_field, id_field, id_list_field, instant_field,
    integer_field, object_list_field, require_id, string_field, Object,
};
use crate::normalize::{unwrap_list_envelope, NormalizeError, NormalizeResult};
use log::warn;
use serde_json::Value;

/// Decodes a programme; a bare day array is accepted as an unpublished programme.
///
/// `event_id` is used when the payload does not name its event.
pub fn normalize_programme(value: &Value, event_id: &EntityId) -> NormalizeResult<Programme> {
    const KIND: EntityKind = EntityKind::Programme;

    if let Value::Array(items) = value {
        let mut programme = Programme::new(event_id.clone());
        programme.days = decode_all(items, normalize_day)?;
        return Ok(programme);
    }

    let object = as_object(value, KIND)?;
    let is_published = match flag_field(object, "is_published", KIND, "is_published")? {
        Some(flag) => flag,
        None => flag_field(object, "published", KIND, "published")?.unwrap_or(false),
    };
    let days_key = if object.contains_key("programme_days") || object.contains_key("programmeDays")
    {
        "programme_days"
    } else {
        "days"
    };

    Ok(Programme {
        event_id: id_field(object, "event_id").unwrap_or_else(|| event_id.clone()),
        is_published,
        published_at: instant_field(object, "published_at", KIND, "published_at")?,
        days: decode_all(object_list_field(object, days_key, KIND, "days")?, normalize_day)?,
    })
}

pub fn normalize_days(value: &Value) -> NormalizeResult<Vec<Day>> {
    decode_all(unwrap_list_envelope(value, EntityKind::Day)?, normalize_day)
}

pub fn normalize_day(value: &Value) -> NormalizeResult<Day> {
    const KIND: EntityKind = EntityKind::Day;

    let object = as_object(value, KIND)?;
    let day_number = count_field(object, "day_number", KIND, "day_number")?.ok_or(
        NormalizeError::MissingField {
            kind: KIND,
            field: "day_number",
        },
    )?;
    let date = date_field(object, "date", KIND, "date")?.ok_or(NormalizeError::MissingField {
        kind: KIND,
        field: "date",
    })?;

    let id = require_id(object, KIND)?;
    reject_flat_sessions(object, &id)?;

    Ok(Day {
        id,
        event_id: id_field(object, "event_id"),
        day_number,
        date,
        title: string_field(object, "title"),
        description: string_field(object, "description"),
        time_slots: decode_all(
            object_list_field(object, "time_slots", KIND, "time_slots")?,
            normalize_time_slot,
        )?,
    })
}

/// Sessions listed straight under a day carry no slot to hang from.
///
/// Without `time_slots` the payload is rejected; alongside them the flat
/// list is ignored.
fn reject_flat_sessions(object: &Object, day_id: &EntityId) -> NormalizeResult<()> {
    let has_flat_sessions = matches!(
        field(object, "sessions"),
        Some(Value::Array(items)) if !items.is_empty()
    );
    if !has_flat_sessions {
        return Ok(());
    }
    if field(object, "time_slots").is_none() {
        return Err(NormalizeError::MisplacedChildren {
            kind: EntityKind::Day,
            field: "sessions",
            expected: "time_slots",
        });
    }
    warn!(
        "event=normalize_day module=normalize status=skip day_id={day_id} reason=flat_sessions_ignored"
    );
    Ok(())
}

pub fn normalize_time_slots(value: &Value) -> NormalizeResult<Vec<TimeSlot>> {
    decode_all(
        unwrap_list_envelope(value, EntityKind::TimeSlot)?,
        normalize_time_slot,
    )
}

pub fn normalize_time_slot(value: &Value) -> NormalizeResult<TimeSlot> {
    const KIND: EntityKind = EntityKind::TimeSlot;

    let object = as_object(value, KIND)?;
    let start_time = instant_field(object, "start_time", KIND, "start_time")?.ok_or(
        NormalizeError::MissingField {
            kind: KIND,
            field: "start_time",
        },
    )?;
    let end_time = instant_field(object, "end_time", KIND, "end_time")?.ok_or(
        NormalizeError::MissingField {
            kind: KIND,
            field: "end_time",
        },
    )?;

    Ok(TimeSlot {
        id: require_id(object, KIND)?,
        programme_day_id: id_field(object, "programme_day_id").or_else(|| id_field(object, "day_id")),
        start_time,
        end_time,
        title: string_field(object, "title"),
        description: string_field(object, "description"),
        sessions: decode_all(
            object_list_field(object, "sessions", KIND, "sessions")?,
            normalize_session,
        )?,
    })
}

pub fn normalize_session(value: &Value) -> NormalizeResult<Session> {
    const KIND: EntityKind = EntityKind::Session;

    let object = as_object(value, KIND)?;
    let raw_type = string_field(object, "type")
        .or_else(|| string_field(object, "session_type"))
        .ok_or(NormalizeError::MissingField {
            kind: KIND,
            field: "type",
        })?;
    let session_type = SessionType::parse(&raw_type).ok_or(NormalizeError::InvalidField {
        kind: KIND,
        field: "type",
        value: raw_type.clone(),
    })?;

    Ok(Session {
        id: require_id(object, KIND)?,
        time_slot_id: id_field(object, "time_slot_id"),
        programme_day_id: id_field(object, "programme_day_id"),
        title: string_field(object, "title").unwrap_or_default(),
        session_type,
        description: string_field(object, "description"),
        location: string_field(object, "location"),
        hall: string_field(object, "hall"),
        catering_notes: string_field(object, "catering_notes"),
        start_time: instant_field(object, "start_time", KIND, "start_time")?,
        end_time: instant_field(object, "end_time", KIND, "end_time")?,
        duration_minutes: count_field(object, "duration_minutes", KIND, "duration_minutes")?,
        speaker_id: id_field(object, "speaker_id").or_else(|| id_field(object, "speaker")),
        moderator_id: id_field(object, "moderator_id").or_else(|| id_field(object, "moderator")),
        panelist_ids: relation_ids(object, "panelist_ids", "panelists")?,
        participant_ids: relation_ids(object, "participant_ids", "participants")?,
        agendas: decode_all(agenda_items(object)?, normalize_agenda)?,
    })
}

pub fn normalize_agenda(value: &Value) -> NormalizeResult<Agenda> {
    const KIND: EntityKind = EntityKind::Agenda;

    let object = as_object(value, KIND)?;
    Ok(Agenda {
        id: require_id(object, KIND)?,
        session_id: id_field(object, "session_id"),
        title: string_field(object, "title").unwrap_or_default(),
        description: string_field(object, "description"),
        order: integer_field(object, "order", KIND, "order")?.unwrap_or(0),
        duration_minutes: count_field(object, "duration_minutes", KIND, "duration_minutes")?,
    })
}

pub fn normalize_speakers(value: &Value) -> NormalizeResult<Vec<Speaker>> {
    decode_all(
        unwrap_list_envelope(value, EntityKind::Speaker)?,
        normalize_speaker,
    )
}

pub fn normalize_speaker(value: &Value) -> NormalizeResult<Speaker> {
    const KIND: EntityKind = EntityKind::Speaker;

    let object = as_object(value, KIND)?;
    Ok(Speaker {
        id: require_id(object, KIND)?,
        name: string_field(object, "name").unwrap_or_default(),
        avatar: string_field(object, "avatar"),
        bio: string_field(object, "bio"),
        title: string_field(object, "title"),
        organization: string_field(object, "organization"),
        email: string_field(object, "email"),
        phone: string_field(object, "phone"),
        created_at: instant_field(object, "created_at", KIND, "created_at")?,
        updated_at: instant_field(object, "updated_at", KIND, "updated_at")?,
    })
}

fn decode_all<T>(
    items: &[Value],
    decode: fn(&Value) -> NormalizeResult<T>,
) -> NormalizeResult<Vec<T>> {
    items.iter().map(decode).collect()
}

/// Reads `<ids_field>` or, failing that, the `id`s of `<objects_field>`.
fn relation_ids(
    object: &Object,
    ids_field: &'static str,
    objects_field: &'static str,
) -> NormalizeResult<Vec<EntityId>> {
    if let Some(ids) = id_list_field(object, ids_field, EntityKind::Session, ids_field)? {
        return Ok(ids);
    }
    Ok(id_list_field(object, objects_field, EntityKind::Session, objects_field)?.unwrap_or_default())
}

fn agenda_items(object: &Object) -> NormalizeResult<&[Value]> {
    let agendas = object_list_field(object, "agendas", EntityKind::Session, "agendas")?;
    if !agendas.is_empty() {
        return Ok(agendas);
    }
    object_list_field(object, "agenda_items", EntityKind::Session, "agenda_items")
}

#[cfg(test)]
mod tests {
    use super::{normalize_day, normalize_programme, normalize_session, normalize_speaker};
    use crate::model::ids::EntityId;
    use crate::model::session::SessionType;
    use crate::normalize::NormalizeError;
    use serde_json::json;

    #[test]
    fn session_reads_camel_case_aliases_and_nested_relations() {
        let value = json!({
            "id": 10,
            "timeSlotId": 4,
            "title": "Future of Energy",
            "type": "panel",
            "startTime": "2026-05-04T09:00:00Z",
            "speaker": {"id": 7, "name": "Ada"},
            "moderatorId": "8",
            "panelists": [{"id": 9}, {"id": 11}],
            "agendaItems": [{"id": 1, "title": "Intro", "order": 1}]
        });

        let session = normalize_session(&value).expect("session should decode");
        assert_eq!(session.id, EntityId::from("10"));
        assert_eq!(session.time_slot_id, Some(EntityId::from("4")));
        assert_eq!(session.session_type, SessionType::Panel);
        assert_eq!(session.speaker_id, Some(EntityId::from("7")));
        assert_eq!(session.moderator_id, Some(EntityId::from("8")));
        assert_eq!(
            session.panelist_ids,
            vec![EntityId::from("9"), EntityId::from("11")]
        );
        assert_eq!(session.agendas.len(), 1);
        assert!(session.end_time.is_none());
    }

    #[test]
    fn session_rejects_unknown_type() {
        let err = normalize_session(&json!({"id": 1, "type": "workshop"}))
            .expect_err("unknown session type must be rejected");
        assert!(matches!(err, NormalizeError::InvalidField { field: "type", .. }));
    }

    #[test]
    fn day_requires_identity() {
        let err = normalize_day(&json!({"day_number": 1, "date": "2026-05-04"}))
            .expect_err("day without id must be rejected");
        assert!(matches!(err, NormalizeError::MissingField { field: "id", .. }));
    }

    #[test]
    fn day_decodes_nested_slots_and_sessions() {
        let value = json!({
            "id": "d1",
            "eventId": "evt",
            "dayNumber": "2",
            "date": "2026-05-05",
            "timeSlots": [{
                "id": "slot-1",
                "start_time": "2026-05-05 09:00:00",
                "end_time": "2026-05-05 10:00:00",
                "sessions": [{"id": "s1", "type": "keynote", "title": "Open"}]
            }]
        });

        let day = normalize_day(&value).expect("day should decode");
        assert_eq!(day.day_number, 2);
        assert_eq!(day.event_id, Some(EntityId::from("evt")));
        assert_eq!(day.time_slots.len(), 1);
        assert_eq!(day.time_slots[0].sessions[0].title, "Open");
    }

    #[test]
    fn programme_accepts_bare_day_list() {
        let value = json!([{"id": "d1", "day_number": 1, "date": "2026-05-04"}]);
        let programme =
            normalize_programme(&value, &EntityId::from("evt")).expect("programme should decode");
        assert_eq!(programme.event_id, EntityId::from("evt"));
        assert!(!programme.is_published);
        assert_eq!(programme.days.len(), 1);
    }

    #[test]
    fn speaker_missing_optional_fields_decode_to_none() {
        let speaker = normalize_speaker(&json!({"id": 5, "name": "Grace", "createdAt": "2026-01-01T00:00:00Z"}))
            .expect("speaker should decode");
        assert_eq!(speaker.name, "Grace");
        assert!(speaker.bio.is_none());
        assert!(speaker.created_at.is_some());
    }
}
