use programme_core::{
    ApiRoutes, CreateSpeakerRequest, EntityId, GatewayError, InMemoryGateway, Method,
    ProgrammeError, SpeakerService, UpdateSpeakerRequest,
};
use serde_json::json;

fn setup() -> SpeakerService<InMemoryGateway> {
    let gateway = InMemoryGateway::with_echo_writes();
    gateway.respond(
        Method::Get,
        "/api/v1/speakers",
        json!({"data": [
            {"id": 1, "name": "Ada", "organization": "Analytical Engines"},
            {"id": 2, "name": "Grace", "createdAt": "2026-01-01T00:00:00Z"}
        ]}),
    );
    SpeakerService::new(gateway, ApiRoutes::default())
}

#[tokio::test]
async fn fetch_then_update_keeps_list_and_current_in_sync() {
    let service = setup();
    let speakers = service.fetch_speakers().await.unwrap();
    assert_eq!(speakers.len(), 2);
    assert!(speakers[1].created_at.is_some());

    service.gateway().respond(
        Method::Get,
        "/api/v1/speakers/1",
        json!({"data": {"id": 1, "name": "Ada"}}),
    );
    service.fetch_speaker(&EntityId::from("1")).await.unwrap();
    assert_eq!(service.current_speaker().unwrap().name, "Ada");

    let updated = service
        .update_speaker(
            &EntityId::from("1"),
            UpdateSpeakerRequest {
                name: Some("Ada Lovelace".to_string()),
                ..UpdateSpeakerRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(
        service.speaker(&EntityId::from("1")).unwrap().name,
        "Ada Lovelace"
    );
    assert_eq!(service.current_speaker().unwrap().name, "Ada Lovelace");
}

#[tokio::test]
async fn create_sends_only_speaker_fields() {
    let service = setup();
    let mut request = CreateSpeakerRequest::new("Katherine");
    request.title = Some("Mathematician".to_string());

    let created = service.create_speaker(request).await.unwrap();
    assert!(!created.id.is_placeholder());
    assert_eq!(service.speakers().len(), 1);

    let sent = service.gateway().requests().pop().unwrap();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(
        sent.body.unwrap(),
        json!({"name": "Katherine", "title": "Mathematician"})
    );
}

#[tokio::test]
async fn delete_clears_current_speaker() {
    let service = setup();
    service.fetch_speakers().await.unwrap();
    service.gateway().respond(
        Method::Get,
        "/api/v1/speakers/2",
        json!({"id": 2, "name": "Grace"}),
    );
    service.fetch_speaker(&EntityId::from("2")).await.unwrap();

    service.delete_speaker(&EntityId::from("2")).await.unwrap();
    assert!(service.current_speaker().is_none());
    assert!(service.speaker(&EntityId::from("2")).is_none());
    assert_eq!(service.speakers().len(), 1);
}

#[tokio::test]
async fn remote_failure_is_reported_and_recorded() {
    let service = setup();
    service.gateway().fail(
        Method::Delete,
        "/api/v1/speakers/1",
        GatewayError::from_response_body(Some(500), None, None),
    );
    service.fetch_speakers().await.unwrap();

    let err = service
        .delete_speaker(&EntityId::from("1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgrammeError::Remote(_)));
    assert_eq!(service.last_error().as_deref(), Some("An error occurred"));
    assert_eq!(service.speakers().len(), 2);
    assert!(!service.is_loading());
}
