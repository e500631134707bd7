//! Create/update/delete commands for days, time slots, sessions and agendas.
//!
//! # Invariants
//! - Preconditions run before any remote call.
//! - Only a successful echo touches the cache; creates land under the cached
//!   parent, updates replace the node wherever it is cached, deletes remove
//!   the whole subtree and any selection inside it.
//! - Targets that are not cached are a cache no-op, never an error.

use crate::error::{PreconditionError, ProgrammeResult};
use crate::gateway::RemoteGateway;
use crate::model::ids::EntityId;
use crate::model::programme::{Day, TimeSlot};
use crate::model::session::{Agenda, Session};
use crate::model::EntityKind;
use crate::normalize::{
    normalize_agenda, normalize_day, normalize_session, normalize_time_slot, unwrap_envelope,
};
use crate::service::requests::{
    AddParticipantRequest, CreateAgendaRequest, CreateDayRequest, CreateSessionRequest,
    CreateTimeSlotRequest, UpdateAgendaRequest, UpdateDayRequest, UpdateSessionRequest,
    UpdateTimeSlotRequest,
};
use crate::service::{ensure_identifier, log_cache_outcome, tracked, ProgrammeService};

impl<G: RemoteGateway> ProgrammeService<G> {
    // ── Days ───────────────────────────────────────────────────────────

    pub async fn create_day(&self, request: CreateDayRequest) -> ProgrammeResult<Day> {
        tracked(&self.status, "create_day", async {
            ensure_identifier(EntityKind::Day, "event_id", &request.event_id)?;
            self.ensure_day_number_free(request.day_number, Some(&request.event_id), None)?;

            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .post(&self.routes.event_days(&request.event_id), Some(body))
                .await?;
            let mut day = normalize_day(unwrap_envelope(&payload))?;
            day.event_id.get_or_insert_with(|| request.event_id.clone());

            let applied = self.tree().insert_day(day.clone());
            log_cache_outcome("create_day", EntityKind::Day, &day.id, applied);
            Ok(day)
        })
        .await
    }

    pub async fn update_day(
        &self,
        day_id: &EntityId,
        request: UpdateDayRequest,
    ) -> ProgrammeResult<Day> {
        tracked(&self.status, "update_day", async {
            ensure_identifier(EntityKind::Day, "id", day_id)?;
            if let Some(day_number) = request.day_number {
                self.ensure_day_number_free(day_number, None, Some(day_id))?;
            }

            let body = serde_json::to_value(&request)?;
            let payload = self.gateway.put(&self.routes.day(day_id), Some(body)).await?;
            let mut day = normalize_day(unwrap_envelope(&payload))?;
            if day.event_id.is_none() {
                day.event_id = self.tree().day(day_id).and_then(|cached| cached.event_id.clone());
            }

            let applied = self.tree().update_day(day.clone());
            log_cache_outcome("update_day", EntityKind::Day, &day.id, applied);
            Ok(day)
        })
        .await
    }

    pub async fn delete_day(&self, day_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "delete_day", async {
            ensure_identifier(EntityKind::Day, "id", day_id)?;
            self.gateway.delete(&self.routes.day(day_id)).await?;

            let applied = self.tree().remove_day(day_id);
            log_cache_outcome("delete_day", EntityKind::Day, day_id, applied);
            Ok(())
        })
        .await
    }

    // ── Time slots ─────────────────────────────────────────────────────

    pub async fn create_time_slot(&self, request: CreateTimeSlotRequest) -> ProgrammeResult<TimeSlot> {
        tracked(&self.status, "create_time_slot", async {
            ensure_identifier(
                EntityKind::TimeSlot,
                "programme_day_id",
                &request.programme_day_id,
            )?;

            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .post(&self.routes.day_time_slots(&request.programme_day_id), Some(body))
                .await?;
            let mut slot = normalize_time_slot(unwrap_envelope(&payload))?;
            slot.programme_day_id
                .get_or_insert_with(|| request.programme_day_id.clone());

            let applied = self.tree().insert_time_slot(slot.clone());
            log_cache_outcome("create_time_slot", EntityKind::TimeSlot, &slot.id, applied);
            Ok(slot)
        })
        .await
    }

    pub async fn update_time_slot(
        &self,
        slot_id: &EntityId,
        request: UpdateTimeSlotRequest,
    ) -> ProgrammeResult<TimeSlot> {
        tracked(&self.status, "update_time_slot", async {
            ensure_identifier(EntityKind::TimeSlot, "id", slot_id)?;
            if let Some(day_id) = &request.programme_day_id {
                ensure_identifier(EntityKind::TimeSlot, "programme_day_id", day_id)?;
            }

            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .put(&self.routes.time_slot(slot_id), Some(body))
                .await?;
            let slot = normalize_time_slot(unwrap_envelope(&payload))?;

            let applied = self.tree().update_time_slot(slot.clone());
            log_cache_outcome("update_time_slot", EntityKind::TimeSlot, &slot.id, applied);
            Ok(slot)
        })
        .await
    }

    pub async fn delete_time_slot(&self, slot_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "delete_time_slot", async {
            ensure_identifier(EntityKind::TimeSlot, "id", slot_id)?;
            self.gateway.delete(&self.routes.time_slot(slot_id)).await?;

            let applied = self.tree().remove_time_slot(slot_id);
            log_cache_outcome("delete_time_slot", EntityKind::TimeSlot, slot_id, applied);
            Ok(())
        })
        .await
    }

    // ── Sessions ───────────────────────────────────────────────────────

    pub async fn create_session(&self, request: CreateSessionRequest) -> ProgrammeResult<Session> {
        tracked(&self.status, "create_session", async {
            ensure_identifier(EntityKind::Session, "time_slot_id", &request.time_slot_id)?;
            if let Some(day_id) = &request.programme_day_id {
                ensure_identifier(EntityKind::Session, "programme_day_id", day_id)?;
            }

            let body = serde_json::to_value(&request)?;
            let payload = self.gateway.post(&self.routes.sessions(), Some(body)).await?;
            let mut session = normalize_session(unwrap_envelope(&payload))?;
            session
                .time_slot_id
                .get_or_insert_with(|| request.time_slot_id.clone());

            let applied = self.tree().insert_session(session.clone());
            log_cache_outcome("create_session", EntityKind::Session, &session.id, applied);
            Ok(session)
        })
        .await
    }

    pub async fn update_session(
        &self,
        session_id: &EntityId,
        request: UpdateSessionRequest,
    ) -> ProgrammeResult<Session> {
        tracked(&self.status, "update_session", async {
            ensure_identifier(EntityKind::Session, "id", session_id)?;
            if let Some(slot_id) = &request.time_slot_id {
                ensure_identifier(EntityKind::Session, "time_slot_id", slot_id)?;
            }

            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .put(&self.routes.session(session_id), Some(body))
                .await?;
            let session = normalize_session(unwrap_envelope(&payload))?;

            let applied = self.tree().update_session(session.clone());
            log_cache_outcome("update_session", EntityKind::Session, &session.id, applied);
            Ok(session)
        })
        .await
    }

    pub async fn delete_session(&self, session_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "delete_session", async {
            ensure_identifier(EntityKind::Session, "id", session_id)?;
            self.gateway.delete(&self.routes.session(session_id)).await?;

            let applied = self.tree().remove_session(session_id);
            log_cache_outcome("delete_session", EntityKind::Session, session_id, applied);
            Ok(())
        })
        .await
    }

    /// Attaches a speaker to a session as a participant.
    pub async fn add_session_participant(
        &self,
        session_id: &EntityId,
        speaker_id: &EntityId,
    ) -> ProgrammeResult<()> {
        tracked(&self.status, "add_session_participant", async {
            ensure_identifier(EntityKind::Session, "id", session_id)?;
            ensure_identifier(EntityKind::Speaker, "speaker_id", speaker_id)?;

            let body = serde_json::to_value(AddParticipantRequest {
                speaker_id: speaker_id.clone(),
            })?;
            self.gateway
                .post(&self.routes.session_participants(session_id), Some(body))
                .await?;

            let applied = self
                .tree()
                .add_session_participant(session_id, speaker_id);
            log_cache_outcome("add_session_participant", EntityKind::Session, session_id, applied);
            Ok(())
        })
        .await
    }

    pub async fn remove_session_participant(
        &self,
        session_id: &EntityId,
        speaker_id: &EntityId,
    ) -> ProgrammeResult<()> {
        tracked(&self.status, "remove_session_participant", async {
            ensure_identifier(EntityKind::Session, "id", session_id)?;
            ensure_identifier(EntityKind::Speaker, "speaker_id", speaker_id)?;
            self.gateway
                .delete(&self.routes.session_participant(session_id, speaker_id))
                .await?;

            let applied = self
                .tree()
                .remove_session_participant(session_id, speaker_id);
            log_cache_outcome(
                "remove_session_participant",
                EntityKind::Session,
                session_id,
                applied,
            );
            Ok(())
        })
        .await
    }

    // ── Agendas ────────────────────────────────────────────────────────

    pub async fn create_agenda(&self, request: CreateAgendaRequest) -> ProgrammeResult<Agenda> {
        tracked(&self.status, "create_agenda", async {
            ensure_identifier(EntityKind::Agenda, "session_id", &request.session_id)?;

            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .post(&self.routes.session_agendas(&request.session_id), Some(body))
                .await?;
            let mut agenda = normalize_agenda(unwrap_envelope(&payload))?;
            agenda
                .session_id
                .get_or_insert_with(|| request.session_id.clone());

            let applied = self.tree().insert_agenda(agenda.clone());
            log_cache_outcome("create_agenda", EntityKind::Agenda, &agenda.id, applied);
            Ok(agenda)
        })
        .await
    }

    pub async fn update_agenda(
        &self,
        agenda_id: &EntityId,
        request: UpdateAgendaRequest,
    ) -> ProgrammeResult<Agenda> {
        tracked(&self.status, "update_agenda", async {
            ensure_identifier(EntityKind::Agenda, "id", agenda_id)?;

            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .put(&self.routes.agenda(agenda_id), Some(body))
                .await?;
            let agenda = normalize_agenda(unwrap_envelope(&payload))?;

            let applied = self.tree().update_agenda(agenda.clone());
            log_cache_outcome("update_agenda", EntityKind::Agenda, &agenda.id, applied);
            Ok(agenda)
        })
        .await
    }

    pub async fn delete_agenda(&self, agenda_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "delete_agenda", async {
            ensure_identifier(EntityKind::Agenda, "id", agenda_id)?;
            self.gateway.delete(&self.routes.agenda(agenda_id)).await?;

            let applied = self.tree().remove_agenda(agenda_id);
            log_cache_outcome("delete_agenda", EntityKind::Agenda, agenda_id, applied);
            Ok(())
        })
        .await
    }

    /// Day numbers start at 1 and are unique within the cached programme.
    ///
    /// `event_id` scopes a create to the cached programme; `exclude` names
    /// the day being updated, whose own number does not count.
    fn ensure_day_number_free(
        &self,
        day_number: u32,
        event_id: Option<&EntityId>,
        exclude: Option<&EntityId>,
    ) -> Result<(), PreconditionError> {
        if day_number < 1 {
            return Err(PreconditionError::InvalidDayNumber(day_number));
        }

        let tree = self.tree();
        let in_scope = match (event_id, exclude) {
            (Some(event_id), _) => tree.event_id() == Some(event_id),
            (None, Some(day_id)) => tree.day(day_id).is_some(),
            (None, None) => false,
        };
        // Uniqueness is only knowable for the cached programme; the remote
        // rejects clashes elsewhere.
        if !in_scope {
            return Ok(());
        }

        let taken = tree
            .days()
            .iter()
            .find(|day| day.day_number == day_number && Some(&day.id) != exclude);
        match taken {
            Some(existing) => Err(PreconditionError::DuplicateDayNumber {
                day_number,
                existing_day_id: existing.id.to_string(),
            }),
            None => Ok(()),
        }
    }
}
