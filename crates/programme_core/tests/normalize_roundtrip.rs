use programme_core::normalize::{
    normalize_agenda, normalize_day, normalize_programme, normalize_session, normalize_speaker,
    normalize_time_slot, unwrap_envelope,
};
use programme_core::{EntityId, NormalizeError};
use serde_json::json;

fn camel_case_day() -> serde_json::Value {
    json!({
        "id": 3,
        "eventId": "evt-1",
        "dayNumber": "2",
        "date": "2026-05-05T00:00:00Z",
        "title": "Workshops",
        "timeSlots": [{
            "id": 31,
            "dayId": 3,
            "startTime": "2026-05-05T13:00:00+02:00",
            "endTime": "2026-05-05T14:00:00+02:00",
            "sessions": [{
                "id": 310,
                "timeSlotId": 31,
                "title": "Hands-on",
                "type": "PANEL",
                "moderator": {"id": 8},
                "panelists": [{"id": 9}, {"id": "10"}],
                "participantIds": [11],
                "durationMinutes": 45,
                "agendaItems": [
                    {"id": 2, "title": "Wrap-up", "order": 2},
                    {"id": 1, "title": "Intro", "order": "1"}
                ]
            }]
        }]
    })
}

#[test]
fn normalizing_a_normalized_day_is_a_no_op() {
    let first = normalize_day(&camel_case_day()).unwrap();
    let reserialized = serde_json::to_value(&first).unwrap();
    let second = normalize_day(&reserialized).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.day_number, 2);
    let slot = &first.time_slots[0];
    assert_eq!(slot.programme_day_id, Some(EntityId::from("3")));
    let session = &slot.sessions[0];
    assert_eq!(session.moderator_id, Some(EntityId::from("8")));
    assert_eq!(
        session.panelist_ids,
        vec![EntityId::from("9"), EntityId::from("10")]
    );
    assert_eq!(session.participant_ids, vec![EntityId::from("11")]);
    assert_eq!(session.agendas.len(), 2);
}

#[test]
fn every_kind_round_trips_through_its_canonical_form() {
    let programme_payload = json!({
        "data": {"event_id": "evt-1", "published": 1, "days": [camel_case_day()]}
    });
    let programme =
        normalize_programme(unwrap_envelope(&programme_payload), &EntityId::from("evt-1")).unwrap();
    let again = normalize_programme(
        &serde_json::to_value(&programme).unwrap(),
        &EntityId::from("ignored"),
    )
    .unwrap();
    assert_eq!(programme, again);
    assert!(programme.is_published);

    let slot = programme.days[0].time_slots[0].clone();
    let value = serde_json::to_value(&slot).unwrap();
    assert_eq!(normalize_time_slot(&value).unwrap(), slot);

    let session = slot.sessions[0].clone();
    let value = serde_json::to_value(&session).unwrap();
    assert_eq!(normalize_session(&value).unwrap(), session);

    let agenda = session.agendas[0].clone();
    let value = serde_json::to_value(&agenda).unwrap();
    assert_eq!(normalize_agenda(&value).unwrap(), agenda);

    let speaker = normalize_speaker(&json!({
        "id": 5, "name": "Grace", "createdAt": "2026-01-01 08:00:00"
    }))
    .unwrap();
    let value = serde_json::to_value(&speaker).unwrap();
    assert_eq!(normalize_speaker(&value).unwrap(), speaker);
}

#[test]
fn normalizing_never_touches_the_input() {
    let payload = camel_case_day();
    let copy = payload.clone();
    normalize_day(&payload).unwrap();
    assert_eq!(payload, copy);
}

#[test]
fn structurally_unusable_payloads_are_rejected() {
    assert!(matches!(
        normalize_day(&json!("day")),
        Err(NormalizeError::NotAnObject { .. })
    ));
    assert!(matches!(
        normalize_day(&json!({"id": "undefined", "day_number": 1, "date": "2026-05-04"})),
        Err(NormalizeError::MissingField { field: "id", .. })
    ));
    assert!(matches!(
        normalize_time_slot(&json!({"id": 1, "start_time": "soon", "end_time": "later"})),
        Err(NormalizeError::InvalidField { field: "start_time", .. })
    ));
}

#[test]
fn day_with_sessions_outside_time_slots_is_rejected() {
    let payload = json!({
        "id": 1,
        "day_number": 1,
        "date": "2026-05-04",
        "sessions": [{"id": 10, "title": "Opening", "type": "keynote"}]
    });

    let err = normalize_day(&payload).unwrap_err();
    assert!(matches!(
        err,
        NormalizeError::MisplacedChildren { field: "sessions", expected: "time_slots", .. }
    ));
}

#[test]
fn flat_sessions_next_to_time_slots_are_ignored() {
    let payload = json!({
        "id": 1,
        "dayNumber": 1,
        "date": "2026-05-04",
        "timeSlots": [],
        "sessions": [{"id": 10, "title": "Opening", "type": "keynote"}]
    });

    let day = normalize_day(&payload).unwrap();
    assert!(day.time_slots.is_empty());
    assert!(normalize_day(&json!({"id": 2, "day_number": 2, "date": "2026-05-05", "sessions": []})).is_ok());
}
