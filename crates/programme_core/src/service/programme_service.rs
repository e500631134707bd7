//! Programme query, selection and publication service.
//!
//! # Responsibility
//! - Load programmes, days and per-day time slots into the cached tree.
//! - Own the selection pointers and the lazy hydration rule.
//! - Expose conflict checks over the current cache.
//!
//! # Invariants
//! - Fetch failures surface the error and leave the cache as it was.
//! - Readers get owned snapshots; no lock is handed out.
//!
//! # See also
//! - `service::schedule_commands` for create/update/delete commands.

use crate::config::{HydrationMode, ProgrammeConfig};
use crate::conflict;
use crate::error::ProgrammeResult;
use crate::gateway::{ApiRoutes, RemoteGateway};
use crate::model::ids::EntityId;
use crate::model::interval::TimeInterval;
use crate::model::programme::{Day, Programme, TimeSlot};
use crate::model::session::Session;
use crate::model::EntityKind;
use crate::normalize::fields::{as_object, instant_field};
use crate::normalize::{normalize_days, normalize_programme, normalize_time_slots, unwrap_envelope};
use crate::service::status::ServiceStatus;
use crate::service::{ensure_identifier, log_cache_outcome, tracked};
use crate::store::ProgrammeTree;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Programme use-case facade over a remote gateway.
pub struct ProgrammeService<G: RemoteGateway> {
    pub(crate) gateway: G,
    pub(crate) routes: ApiRoutes,
    config: ProgrammeConfig,
    tree: Mutex<ProgrammeTree>,
    pub(crate) status: ServiceStatus,
}

impl<G: RemoteGateway> ProgrammeService<G> {
    pub fn new(gateway: G, config: ProgrammeConfig) -> Self {
        Self {
            gateway,
            routes: ApiRoutes::new(config.api_prefix.clone()),
            config,
            tree: Mutex::new(ProgrammeTree::new()),
            status: ServiceStatus::default(),
        }
    }

    pub fn config(&self) -> &ProgrammeConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Loads the full programme of `event_id`, replacing the cache.
    pub async fn fetch_programme(&self, event_id: &EntityId) -> ProgrammeResult<Programme> {
        tracked(&self.status, "fetch_programme", async {
            ensure_identifier(EntityKind::Programme, "event_id", event_id)?;
            let payload = self.gateway.get(&self.routes.programme(event_id)).await?;
            let programme = normalize_programme(unwrap_envelope(&payload), event_id)?;

            let mut tree = self.tree();
            tree.replace_programme(programme);
            info!(
                "event=fetch_programme module=service status=ok event_id={} days={}",
                event_id,
                tree.days().len()
            );
            Ok(tree.programme().unwrap_or_else(|| Programme::new(event_id.clone())))
        })
        .await
    }

    /// Loads the days of `event_id`, replacing the cached days.
    pub async fn fetch_days(&self, event_id: &EntityId) -> ProgrammeResult<Vec<Day>> {
        tracked(&self.status, "fetch_days", async {
            ensure_identifier(EntityKind::Day, "event_id", event_id)?;
            let payload = self.gateway.get(&self.routes.event_days(event_id)).await?;
            let days = normalize_days(&payload)?;

            let mut tree = self.tree();
            tree.replace_days(event_id.clone(), days);
            info!(
                "event=fetch_days module=service status=ok event_id={} days={}",
                event_id,
                tree.days().len()
            );
            Ok(tree.days().to_vec())
        })
        .await
    }

    /// Loads the time slots of one day and hydrates the cached day with them.
    ///
    /// Returns the decoded slots even when the day is not cached.
    pub async fn fetch_time_slots(&self, day_id: &EntityId) -> ProgrammeResult<Vec<TimeSlot>> {
        tracked(&self.status, "fetch_time_slots", async {
            ensure_identifier(EntityKind::TimeSlot, "programme_day_id", day_id)?;
            let payload = self.gateway.get(&self.routes.day_time_slots(day_id)).await?;
            let slots = normalize_time_slots(&payload)?;

            let mut tree = self.tree();
            let applied = tree.replace_time_slots(day_id, slots.clone());
            log_cache_outcome("fetch_time_slots", EntityKind::Day, day_id, applied);
            if !applied {
                return Ok(slots);
            }
            Ok(tree
                .day(day_id)
                .map(|day| day.time_slots.clone())
                .unwrap_or_default())
        })
        .await
    }

    /// Selects a cached day, or clears the selection with `None`.
    ///
    /// Returns `false` for ids that are not cached. With lazy hydration,
    /// selecting a day without time slots fetches them.
    pub async fn set_current_day(&self, day_id: Option<&EntityId>) -> ProgrammeResult<bool> {
        // The lock is released before fetching; holding it across the await
        // would block every reader until the remote answers.
        let hydrate = {
            let mut tree = self.tree();
            if !tree.select_day(day_id) {
                debug!("event=set_current_day module=service status=skip reason=not_cached");
                return Ok(false);
            }
            // Only an empty day is hydrated, so reselecting never refetches.
            let empty = tree
                .current_day()
                .is_some_and(|day| day.time_slots.is_empty());
            self.config.hydration == HydrationMode::Lazy && empty
        };

        if let (true, Some(day_id)) = (hydrate, day_id) {
            self.fetch_time_slots(day_id).await?;
        }
        Ok(true)
    }

    /// Selects a cached session, or clears the selection with `None`.
    pub fn set_current_session(&self, session_id: Option<&EntityId>) -> bool {
        let selected = self.tree().select_session(session_id);
        if !selected {
            debug!("event=set_current_session module=service status=skip reason=not_cached");
        }
        selected
    }

    /// Publishes the programme; the cache follows when it holds `event_id`.
    pub async fn publish_programme(&self, event_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "publish_programme", async {
            ensure_identifier(EntityKind::Programme, "event_id", event_id)?;
            let payload = self
                .gateway
                .post(&self.routes.programme_publish(event_id), None)
                .await?;
            // The publish echo may be empty; the local clock stands in.
            let published_at = echoed_published_at(&payload)?.unwrap_or_else(Utc::now);

            // A publish for another event must not flip the cached one.
            let mut tree = self.tree();
            let applied = tree.event_id() == Some(event_id);
            if applied {
                tree.mark_published(published_at);
            }
            log_cache_outcome("publish_programme", EntityKind::Programme, event_id, applied);
            Ok(())
        })
        .await
    }

    pub async fn unpublish_programme(&self, event_id: &EntityId) -> ProgrammeResult<()> {
        tracked(&self.status, "unpublish_programme", async {
            ensure_identifier(EntityKind::Programme, "event_id", event_id)?;
            self.gateway
                .post(&self.routes.programme_unpublish(event_id), None)
                .await?;

            let mut tree = self.tree();
            let applied = tree.event_id() == Some(event_id);
            if applied {
                tree.mark_unpublished();
            }
            log_cache_outcome("unpublish_programme", EntityKind::Programme, event_id, applied);
            Ok(())
        })
        .await
    }

    /// Cached sessions overlapping `[start, end)`, except `exclude`.
    pub fn check_time_conflicts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<&EntityId>,
    ) -> Vec<Session> {
        conflict::check_time_conflicts(
            &self.tree(),
            TimeInterval::new(start, end),
            exclude,
            self.config.interval_policy,
        )
    }

    /// Cached sessions overlapping `[start, end)` where `speaker_id` has a role.
    pub fn check_speaker_conflicts(
        &self,
        speaker_id: &EntityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<&EntityId>,
    ) -> Vec<Session> {
        conflict::check_speaker_conflicts(
            &self.tree(),
            speaker_id,
            TimeInterval::new(start, end),
            exclude,
            self.config.interval_policy,
        )
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Owned copy of the whole cache, selection included.
    pub fn snapshot(&self) -> ProgrammeTree {
        self.tree().clone()
    }

    pub fn programme(&self) -> Option<Programme> {
        self.tree().programme()
    }

    pub fn days(&self) -> Vec<Day> {
        self.tree().days().to_vec()
    }

    pub fn day(&self, day_id: &EntityId) -> Option<Day> {
        self.tree().day(day_id).cloned()
    }

    pub fn time_slot(&self, slot_id: &EntityId) -> Option<TimeSlot> {
        self.tree().time_slot(slot_id).cloned()
    }

    pub fn session(&self, session_id: &EntityId) -> Option<Session> {
        self.tree().session(session_id).cloned()
    }

    /// The slot currently holding `session_id`, resolved through the parent index.
    pub fn slot_of_session(&self, session_id: &EntityId) -> Option<TimeSlot> {
        let tree = self.tree();
        let slot_id = tree.slot_of_session(session_id)?;
        tree.time_slot(slot_id).cloned()
    }

    /// Every cached session across all days, in tree order.
    pub fn sessions(&self) -> Vec<Session> {
        self.tree().sessions().cloned().collect()
    }

    pub fn current_day(&self) -> Option<Day> {
        self.tree().current_day().cloned()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.tree().current_session().cloned()
    }

    pub fn current_day_sessions(&self) -> Vec<Session> {
        self.tree()
            .current_day_sessions()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_published(&self) -> bool {
        self.tree().is_published()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.tree().published_at()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.status.last_error()
    }

    /// Drops the cache, both selection pointers and the last failure.
    pub fn reset(&self) {
        self.tree().clear();
        self.status.clear_error();
        info!("event=reset module=service status=ok");
    }

    pub(crate) fn tree(&self) -> MutexGuard<'_, ProgrammeTree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reads `published_at` from a publish echo; an empty echo yields `None`.
fn echoed_published_at(payload: &Value) -> ProgrammeResult<Option<DateTime<Utc>>> {
    let inner = unwrap_envelope(payload);
    if !inner.is_object() {
        return Ok(None);
    }
    let object = as_object(inner, EntityKind::Programme)?;
    Ok(instant_field(
        object,
        "published_at",
        EntityKind::Programme,
        "published_at",
    )?)
}
