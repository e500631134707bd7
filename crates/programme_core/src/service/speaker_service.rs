//! Speaker directory service.
//!
//! Keeps the fetched speaker list and the current speaker consistent with
//! remote outcomes. Sessions reference speakers by id only, so nothing here
//! touches the programme tree.

use crate::error::ProgrammeResult;
use crate::gateway::{ApiRoutes, RemoteGateway};
use crate::model::ids::EntityId;
use crate::model::speaker::Speaker;
use crate::model::EntityKind;
use crate::normalize::{normalize_speaker, normalize_speakers, unwrap_envelope};
use crate::service::requests::{CreateSpeakerRequest, UpdateSpeakerRequest};
use crate::service::status::ServiceStatus;
use crate::service::{ensure_identifier, log_cache_outcome, tracked};
use log::info;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SpeakerDirectory {
    speakers: Vec<Speaker>,
    current: Option<Speaker>,
}

pub struct SpeakerService<G: RemoteGateway> {
    gateway: G,
    routes: ApiRoutes,
    directory: Mutex<SpeakerDirectory>,
    status: ServiceStatus,
}

impl<G: RemoteGateway> SpeakerService<G> {
    pub fn new(gateway: G, routes: ApiRoutes) -> Self {
        Self {
            gateway,
            routes,
            directory: Mutex::new(SpeakerDirectory::default()),
            status: ServiceStatus::default(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn fetch_speakers(&self) -> ProgrammeResult<Vec<Speaker>> {
        tracked(&self.status, "fetch_speakers", async {
            let payload = self.gateway.get(&self.routes.speakers()).await?;
            let speakers = normalize_speakers(&payload)?;
            info!(
                "event=fetch_speakers module=service status=ok count={}",
                speakers.len()
            );
            self.directory().speakers = speakers.clone();
            Ok(speakers)
        })
        .await
    }

    /// Loads one speaker and makes it the current speaker.
    pub async fn fetch_speaker(&self, speaker_id: &EntityId) -> ProgrammeResult<Speaker> {
        tracked(&self.status, "fetch_speaker", async {
            ensure_identifier(EntityKind::Speaker, "id", speaker_id)?;
            let payload = self.gateway.get(&self.routes.speaker(speaker_id)).await?;
            let speaker = normalize_speaker(unwrap_envelope(&payload))?;
            self.directory().current = Some(speaker.clone());
            Ok(speaker)
        })
        .await
    }

    pub async fn create_speaker(&self, request: CreateSpeakerRequest) -> ProgrammeResult<Speaker> {
        tracked(&self.status, "create_speaker", async {
            let body = serde_json::to_value(&request)?;
            let payload = self.gateway.post(&self.routes.speakers(), Some(body)).await?;
            let speaker = normalize_speaker(unwrap_envelope(&payload))?;
            self.directory().speakers.push(speaker.clone());
            log_cache_outcome("create_speaker", EntityKind::Speaker, &speaker.id, true);
            Ok(speaker)
        })
        .await
    }

    pub async fn update_speaker(
        &self,
        speaker_id: &EntityId,
        request: UpdateSpeakerRequest,
    ) -> ProgrammeResult<Speaker> {
        tracked(&self.status, "update_speaker", async {
            ensure_identifier(EntityKind::Speaker, "id", speaker_id)?;
            let body = serde_json::to_value(&request)?;
            let payload = self
                .gateway
                .put(&self.routes.speaker(speaker_id), Some(body))
                .await?;
            let speaker = normalize_speaker(unwrap_envelope(&payload))?;

            let mut directory = self.directory();
            let mut applied = false;
            if let Some(cached) = directory
                .speakers
                .iter_mut()
                .find(|cached| &cached.id == speaker_id)
            {
                *cached = speaker.clone();
                applied = true;
            }
            if directory
                .current
                .as_ref()
                .is_some_and(|current| &current.id == speaker_id)
            {
                directory.current = Some(speaker.clone());
                applied = true;
            }
            log_cache_outcome("update_speaker", EntityKind::Speaker, speaker_id, applied);
            Ok(speaker)
        })
        .await
    }

    pub async fn delete_speaker(&self, speaker_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "delete_speaker", async {
            ensure_identifier(EntityKind::Speaker, "id", speaker_id)?;
            self.gateway.delete(&self.routes.speaker(speaker_id)).await?;

            let mut directory = self.directory();
            let before = directory.speakers.len();
            directory.speakers.retain(|speaker| &speaker.id != speaker_id);
            let mut applied = directory.speakers.len() != before;
            if directory
                .current
                .as_ref()
                .is_some_and(|current| &current.id == speaker_id)
            {
                directory.current = None;
                applied = true;
            }
            log_cache_outcome("delete_speaker", EntityKind::Speaker, speaker_id, applied);
            Ok(())
        })
        .await
    }

    pub fn speakers(&self) -> Vec<Speaker> {
        self.directory().speakers.clone()
    }

    pub fn speaker(&self, speaker_id: &EntityId) -> Option<Speaker> {
        self.directory()
            .speakers
            .iter()
            .find(|speaker| &speaker.id == speaker_id)
            .cloned()
    }

    pub fn current_speaker(&self) -> Option<Speaker> {
        self.directory().current.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.status.last_error()
    }

    pub fn reset(&self) {
        *self.directory() = SpeakerDirectory::default();
        self.status.clear_error();
    }

    fn directory(&self) -> MutexGuard<'_, SpeakerDirectory> {
        self.directory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
