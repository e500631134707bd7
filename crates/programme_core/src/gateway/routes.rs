//! Remote resource paths.

use crate::model::ids::EntityId;

/// Builds resource paths under a configurable prefix such as `/api/v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    prefix: String,
}

impl ApiRoutes {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn programme(&self, event_id: &EntityId) -> String {
        format!("{}/events/{event_id}/programme", self.prefix)
    }

    pub fn programme_publish(&self, event_id: &EntityId) -> String {
        format!("{}/publish", self.programme(event_id))
    }

    pub fn programme_unpublish(&self, event_id: &EntityId) -> String {
        format!("{}/unpublish", self.programme(event_id))
    }

    pub fn event_days(&self, event_id: &EntityId) -> String {
        format!("{}/events/{event_id}/programme-days", self.prefix)
    }

    pub fn day(&self, day_id: &EntityId) -> String {
        format!("{}/programme-days/{day_id}", self.prefix)
    }

    pub fn day_time_slots(&self, day_id: &EntityId) -> String {
        format!("{}/time-slots", self.day(day_id))
    }

    pub fn time_slot(&self, slot_id: &EntityId) -> String {
        format!("{}/time-slots/{slot_id}", self.prefix)
    }

    pub fn sessions(&self) -> String {
        format!("{}/sessions", self.prefix)
    }

    pub fn session(&self, session_id: &EntityId) -> String {
        format!("{}/sessions/{session_id}", self.prefix)
    }

    pub fn session_agendas(&self, session_id: &EntityId) -> String {
        format!("{}/agendas", self.session(session_id))
    }

    pub fn agenda(&self, agenda_id: &EntityId) -> String {
        format!("{}/agendas/{agenda_id}", self.prefix)
    }

    pub fn session_participants(&self, session_id: &EntityId) -> String {
        format!("{}/participants", self.session(session_id))
    }

    pub fn session_participant(&self, session_id: &EntityId, speaker_id: &EntityId) -> String {
        format!("{}/{speaker_id}", self.session_participants(session_id))
    }

    pub fn speakers(&self) -> String {
        format!("{}/speakers", self.prefix)
    }

    pub fn speaker(&self, speaker_id: &EntityId) -> String {
        format!("{}/speakers/{speaker_id}", self.prefix)
    }
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self::new("/api/v1")
    }
}

#[cfg(test)]
mod tests {
    use super::ApiRoutes;
    use crate::model::ids::EntityId;

    #[test]
    fn builds_nested_paths_under_prefix() {
        let routes = ApiRoutes::new("/api/v1/");
        let session = EntityId::from("12");
        assert_eq!(routes.sessions(), "/api/v1/sessions");
        assert_eq!(
            routes.session_participant(&session, &EntityId::from("7")),
            "/api/v1/sessions/12/participants/7"
        );
        assert_eq!(
            routes.programme_publish(&EntityId::from("evt")),
            "/api/v1/events/evt/programme/publish"
        );
        assert_eq!(
            routes.day_time_slots(&EntityId::from("3")),
            "/api/v1/programme-days/3/time-slots"
        );
    }
}
