//! In-memory programme hierarchy.
//!
//! # Responsibility
//! - Own the cached Programme → Day → TimeSlot → Session → Agenda tree.
//! - Apply id-scoped inserts, updates and removals, re-sorting after each.
//! - Keep the parent index and selection pointers consistent with the tree.
//!
//! # Invariants
//! - Days are sorted by `day_number`; slots by `start_time`; sessions by
//!   effective start; agendas by `order`.
//! - The parent index maps every cached slot, session and agenda id to the
//!   id of the node that currently holds it, and nothing else.
//! - Selection pointers are ids that always resolve to a cached node, or are
//!   `None`.
//! - Mutations targeting ids that are not cached leave the tree unchanged
//!   and report `false`.

use crate::model::ids::EntityId;
use crate::model::programme::{sort_days, Day, Programme, TimeSlot};
use crate::model::session::{Agenda, Session};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Child id → holding parent id, per level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ParentIndex {
    slot_day: HashMap<EntityId, EntityId>,
    session_slot: HashMap<EntityId, EntityId>,
    agenda_session: HashMap<EntityId, EntityId>,
}

impl ParentIndex {
    fn rebuild(days: &[Day]) -> Self {
        let mut index = Self::default();
        for day in days {
            index.index_day(day);
        }
        index
    }

    fn index_day(&mut self, day: &Day) {
        for slot in &day.time_slots {
            self.index_slot(&day.id, slot);
        }
    }

    fn index_slot(&mut self, day_id: &EntityId, slot: &TimeSlot) {
        self.slot_day.insert(slot.id.clone(), day_id.clone());
        for session in &slot.sessions {
            self.index_session(&slot.id, session);
        }
    }

    fn index_session(&mut self, slot_id: &EntityId, session: &Session) {
        self.session_slot.insert(session.id.clone(), slot_id.clone());
        for agenda in &session.agendas {
            self.agenda_session
                .insert(agenda.id.clone(), session.id.clone());
        }
    }

    fn unindex_day(&mut self, day: &Day) {
        for slot in &day.time_slots {
            self.unindex_slot(slot);
        }
    }

    fn unindex_slot(&mut self, slot: &TimeSlot) {
        self.slot_day.remove(&slot.id);
        for session in &slot.sessions {
            self.unindex_session(session);
        }
    }

    fn unindex_session(&mut self, session: &Session) {
        self.session_slot.remove(&session.id);
        for agenda in &session.agendas {
            self.agenda_session.remove(&agenda.id);
        }
    }
}

type SlotPath = (usize, usize);
type SessionPath = (usize, usize, usize);
type AgendaPath = (usize, usize, usize, usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammeTree {
    event_id: Option<EntityId>,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    days: Vec<Day>,
    index: ParentIndex,
    current_day: Option<EntityId>,
    current_session: Option<EntityId>,
}

impl ProgrammeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached node, the publication state and both pointers.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ── Bulk loads ─────────────────────────────────────────────────────

    /// Replaces the whole cache with a fetched programme.
    pub fn replace_programme(&mut self, programme: Programme) {
        let mut days = programme.days;
        for day in &mut days {
            day.event_id = Some(programme.event_id.clone());
            day.link_children();
            day.sort_recursive();
        }
        sort_days(&mut days);

        self.index = ParentIndex::rebuild(&days);
        self.event_id = Some(programme.event_id);
        self.is_published = programme.is_published;
        self.published_at = if programme.is_published {
            programme.published_at
        } else {
            None
        };
        self.days = days;
        self.prune_selection();
    }

    /// Replaces the cached days of `event_id`.
    ///
    /// Switching to another event resets the publication state, which
    /// belonged to the previous event.
    pub fn replace_days(&mut self, event_id: EntityId, mut days: Vec<Day>) {
        for day in &mut days {
            day.event_id = Some(event_id.clone());
            day.link_children();
            day.sort_recursive();
        }
        sort_days(&mut days);

        if self.event_id.as_ref() != Some(&event_id) {
            self.is_published = false;
            self.published_at = None;
        }
        self.index = ParentIndex::rebuild(&days);
        self.event_id = Some(event_id);
        self.days = days;
        self.prune_selection();
    }

    /// Replaces the time slots of one cached day.
    pub fn replace_time_slots(&mut self, day_id: &EntityId, slots: Vec<TimeSlot>) -> bool {
        let Some(position) = self.day_position(day_id) else {
            return false;
        };

        for slot in &self.days[position].time_slots {
            self.index.unindex_slot(slot);
        }
        let mut slots = slots;
        for slot in &mut slots {
            slot.programme_day_id = Some(day_id.clone());
            slot.link_children();
            slot.sort_recursive();
            self.index.index_slot(day_id, slot);
        }

        let day = &mut self.days[position];
        day.time_slots = slots;
        day.sort_time_slots();
        self.prune_selection();
        true
    }

    // ── Days ───────────────────────────────────────────────────────────

    /// Inserts a created day; an already cached id is treated as an update.
    ///
    /// Days naming a different event than the cached programme are ignored.
    pub fn insert_day(&mut self, mut day: Day) -> bool {
        if !self.accepts_event(day.event_id.as_ref()) {
            return false;
        }
        if self.day_position(&day.id).is_some() {
            return self.update_day(day);
        }

        match self.event_id.clone() {
            Some(event_id) => day.event_id = Some(event_id),
            None => self.event_id = day.event_id.clone(),
        }
        day.link_children();
        day.sort_recursive();
        self.index.index_day(&day);
        self.days.push(day);
        sort_days(&mut self.days);
        true
    }

    /// Replaces a cached day's attributes; an echo without slots keeps the cached ones.
    pub fn update_day(&mut self, mut day: Day) -> bool {
        let Some(position) = self.day_position(&day.id) else {
            return false;
        };

        let cached = &mut self.days[position];
        if day.event_id.is_none() {
            day.event_id = cached.event_id.clone();
        }
        if day.time_slots.is_empty() {
            day.time_slots = std::mem::take(&mut cached.time_slots);
        } else {
            self.index.unindex_day(cached);
            day.link_children();
            day.sort_recursive();
            self.index.index_day(&day);
        }
        *cached = day;
        sort_days(&mut self.days);
        self.prune_selection();
        true
    }

    pub fn remove_day(&mut self, day_id: &EntityId) -> bool {
        let Some(position) = self.day_position(day_id) else {
            return false;
        };
        let removed = self.days.remove(position);
        self.index.unindex_day(&removed);
        self.prune_selection();
        true
    }

    // ── Time slots ─────────────────────────────────────────────────────

    /// Inserts a created slot under its cached day.
    pub fn insert_time_slot(&mut self, mut slot: TimeSlot) -> bool {
        if self.index.slot_day.contains_key(&slot.id) {
            return self.update_time_slot(slot);
        }
        let Some(day_id) = slot.programme_day_id.clone() else {
            return false;
        };
        let Some(position) = self.day_position(&day_id) else {
            return false;
        };

        slot.link_children();
        slot.sort_recursive();
        self.index.index_slot(&day_id, &slot);
        let day = &mut self.days[position];
        day.time_slots.push(slot);
        day.sort_time_slots();
        true
    }

    /// Replaces a cached slot, relocating it when the echo names another day.
    ///
    /// An echo without sessions keeps the cached sessions. When the echo
    /// names a day that is not cached, the slot leaves the cache.
    pub fn update_time_slot(&mut self, mut slot: TimeSlot) -> bool {
        let Some((day_pos, slot_pos)) = self.slot_path(&slot.id) else {
            return false;
        };

        let cached = self.days[day_pos].time_slots.remove(slot_pos);
        self.index.unindex_slot(&cached);
        if slot.sessions.is_empty() {
            slot.sessions = cached.sessions;
        }

        let target = match &slot.programme_day_id {
            Some(day_id) if day_id != &self.days[day_pos].id => self.day_position(day_id),
            _ => Some(day_pos),
        };
        if let Some(target) = target {
            let day = &mut self.days[target];
            // An echo that omits the day keeps the slot where it is.
            slot.programme_day_id = Some(day.id.clone());
            slot.link_children();
            slot.sort_recursive();
            self.index.index_slot(&day.id, &slot);
            if target == day_pos {
                day.time_slots.insert(slot_pos, slot);
            } else {
                day.time_slots.push(slot);
            }
            day.sort_time_slots();
        }
        self.prune_selection();
        true
    }

    pub fn remove_time_slot(&mut self, slot_id: &EntityId) -> bool {
        let Some((day_pos, slot_pos)) = self.slot_path(slot_id) else {
            return false;
        };
        let removed = self.days[day_pos].time_slots.remove(slot_pos);
        self.index.unindex_slot(&removed);
        self.prune_selection();
        true
    }

    // ── Sessions ───────────────────────────────────────────────────────

    /// Inserts a created session under its cached slot.
    pub fn insert_session(&mut self, mut session: Session) -> bool {
        if self.index.session_slot.contains_key(&session.id) {
            return self.update_session(session);
        }
        let Some(slot_id) = session.time_slot_id.clone() else {
            return false;
        };
        let Some((day_pos, slot_pos)) = self.slot_path(&slot_id) else {
            return false;
        };

        let slot = &mut self.days[day_pos].time_slots[slot_pos];
        session.programme_day_id = slot.programme_day_id.clone();
        session.link_agendas();
        session.sort_agendas();
        self.index.index_session(&slot_id, &session);
        slot.sessions.push(session);
        slot.sort_sessions();
        true
    }

    /// Replaces a cached session, relocating it when the echo names another slot.
    ///
    /// An echo without agendas keeps the cached agendas. When the echo names
    /// a slot that is not cached, the session leaves the cache.
    pub fn update_session(&mut self, mut session: Session) -> bool {
        let Some((day_pos, slot_pos, session_pos)) = self.session_path(&session.id) else {
            return false;
        };

        let cached = self.days[day_pos].time_slots[slot_pos]
            .sessions
            .remove(session_pos);
        self.index.unindex_session(&cached);
        if session.agendas.is_empty() {
            session.agendas = cached.agendas;
        }

        let current_slot_id = self.days[day_pos].time_slots[slot_pos].id.clone();
        let target = match &session.time_slot_id {
            Some(slot_id) if slot_id != &current_slot_id => self.slot_path(slot_id),
            _ => Some((day_pos, slot_pos)),
        };
        if let Some((target_day, target_slot)) = target {
            let slot = &mut self.days[target_day].time_slots[target_slot];
            session.time_slot_id = Some(slot.id.clone());
            session.programme_day_id = slot.programme_day_id.clone();
            session.link_agendas();
            session.sort_agendas();
            self.index.index_session(&slot.id, &session);
            if (target_day, target_slot) == (day_pos, slot_pos) {
                slot.sessions.insert(session_pos, session);
            } else {
                slot.sessions.push(session);
            }
            slot.sort_sessions();
        }
        self.prune_selection();
        true
    }

    pub fn remove_session(&mut self, session_id: &EntityId) -> bool {
        let Some((day_pos, slot_pos, session_pos)) = self.session_path(session_id) else {
            return false;
        };
        let removed = self.days[day_pos].time_slots[slot_pos]
            .sessions
            .remove(session_pos);
        self.index.unindex_session(&removed);
        self.prune_selection();
        true
    }

    /// Adds a participant reference to a cached session once.
    pub fn add_session_participant(&mut self, session_id: &EntityId, speaker_id: &EntityId) -> bool {
        let Some(session) = self.session_mut(session_id) else {
            return false;
        };
        if !session.participant_ids.contains(speaker_id) {
            session.participant_ids.push(speaker_id.clone());
        }
        true
    }

    pub fn remove_session_participant(
        &mut self,
        session_id: &EntityId,
        speaker_id: &EntityId,
    ) -> bool {
        let Some(session) = self.session_mut(session_id) else {
            return false;
        };
        session.participant_ids.retain(|id| id != speaker_id);
        true
    }

    // ── Agendas ────────────────────────────────────────────────────────

    /// Inserts a created agenda item under its cached session.
    pub fn insert_agenda(&mut self, agenda: Agenda) -> bool {
        if self.index.agenda_session.contains_key(&agenda.id) {
            return self.update_agenda(agenda);
        }
        let Some(session_id) = agenda.session_id.clone() else {
            return false;
        };
        let Some(session) = self.session_mut(&session_id) else {
            return false;
        };

        session.agendas.push(agenda.clone());
        session.sort_agendas();
        self.index.agenda_session.insert(agenda.id, session_id);
        true
    }

    /// Replaces a cached agenda item, relocating it when the echo names another session.
    pub fn update_agenda(&mut self, mut agenda: Agenda) -> bool {
        let Some((day_pos, slot_pos, session_pos, agenda_pos)) = self.agenda_path(&agenda.id)
        else {
            return false;
        };

        let holder = &mut self.days[day_pos].time_slots[slot_pos].sessions[session_pos];
        let moves_elsewhere = agenda
            .session_id
            .as_ref()
            .is_some_and(|session_id| session_id != &holder.id);
        if !moves_elsewhere {
            agenda.session_id = Some(holder.id.clone());
            holder.agendas[agenda_pos] = agenda;
            holder.sort_agendas();
            return true;
        }

        holder.agendas.remove(agenda_pos);
        self.index.agenda_session.remove(&agenda.id);
        let target = agenda
            .session_id
            .as_ref()
            .and_then(|session_id| self.session_path(session_id));
        if let Some((day_pos, slot_pos, session_pos)) = target {
            let session = &mut self.days[day_pos].time_slots[slot_pos].sessions[session_pos];
            self.index
                .agenda_session
                .insert(agenda.id.clone(), session.id.clone());
            session.agendas.push(agenda);
            session.sort_agendas();
        }
        true
    }

    pub fn remove_agenda(&mut self, agenda_id: &EntityId) -> bool {
        let Some((day_pos, slot_pos, session_pos, agenda_pos)) = self.agenda_path(agenda_id)
        else {
            return false;
        };
        self.days[day_pos].time_slots[slot_pos].sessions[session_pos]
            .agendas
            .remove(agenda_pos);
        self.index.agenda_session.remove(agenda_id);
        true
    }

    // ── Publication ────────────────────────────────────────────────────

    pub fn mark_published(&mut self, published_at: DateTime<Utc>) {
        self.is_published = true;
        self.published_at = Some(published_at);
    }

    pub fn mark_unpublished(&mut self) {
        self.is_published = false;
        self.published_at = None;
    }

    // ── Selection ──────────────────────────────────────────────────────

    /// Points the day selection at a cached day, or clears it with `None`.
    ///
    /// Returns `false` and leaves the pointer unchanged for uncached ids.
    pub fn select_day(&mut self, day_id: Option<&EntityId>) -> bool {
        match day_id {
            None => {
                self.current_day = None;
                true
            }
            Some(id) if self.day_position(id).is_some() => {
                self.current_day = Some(id.clone());
                true
            }
            Some(_) => false,
        }
    }

    /// Points the session selection at a cached session, or clears it with `None`.
    pub fn select_session(&mut self, session_id: Option<&EntityId>) -> bool {
        match session_id {
            None => {
                self.current_session = None;
                true
            }
            Some(id) if self.session_path(id).is_some() => {
                self.current_session = Some(id.clone());
                true
            }
            Some(_) => false,
        }
    }

    pub fn current_day(&self) -> Option<&Day> {
        self.current_day.as_ref().and_then(|id| self.day(id))
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current_session.as_ref().and_then(|id| self.session(id))
    }

    /// Sessions of the selected day in slot order; empty without a selection.
    pub fn current_day_sessions(&self) -> Vec<&Session> {
        self.current_day()
            .map(|day| {
                day.time_slots
                    .iter()
                    .flat_map(|slot| slot.sessions.iter())
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn event_id(&self) -> Option<&EntityId> {
        self.event_id.as_ref()
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Owned copy of the cached programme; `None` before any event is loaded.
    pub fn programme(&self) -> Option<Programme> {
        let event_id = self.event_id.clone()?;
        Some(Programme {
            event_id,
            is_published: self.is_published,
            published_at: self.published_at,
            days: self.days.clone(),
        })
    }

    pub fn day(&self, day_id: &EntityId) -> Option<&Day> {
        self.days.iter().find(|day| &day.id == day_id)
    }

    pub fn time_slot(&self, slot_id: &EntityId) -> Option<&TimeSlot> {
        let (day_pos, slot_pos) = self.slot_path(slot_id)?;
        Some(&self.days[day_pos].time_slots[slot_pos])
    }

    pub fn session(&self, session_id: &EntityId) -> Option<&Session> {
        let (day_pos, slot_pos, session_pos) = self.session_path(session_id)?;
        Some(&self.days[day_pos].time_slots[slot_pos].sessions[session_pos])
    }

    pub fn agenda(&self, agenda_id: &EntityId) -> Option<&Agenda> {
        let (day_pos, slot_pos, session_pos, agenda_pos) = self.agenda_path(agenda_id)?;
        Some(&self.days[day_pos].time_slots[slot_pos].sessions[session_pos].agendas[agenda_pos])
    }

    /// Id of the cached slot holding `session_id`.
    pub fn slot_of_session(&self, session_id: &EntityId) -> Option<&EntityId> {
        self.index.session_slot.get(session_id)
    }

    /// Flat view of every cached session in tree order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.scheduled_sessions().map(|(_, session)| session)
    }

    /// Every cached session paired with the slot that holds it, in tree order.
    pub fn scheduled_sessions(&self) -> impl Iterator<Item = (&TimeSlot, &Session)> {
        self.days
            .iter()
            .flat_map(|day| day.time_slots.iter())
            .flat_map(|slot| slot.sessions.iter().map(move |session| (slot, session)))
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn accepts_event(&self, event_id: Option<&EntityId>) -> bool {
        match (&self.event_id, event_id) {
            (Some(cached), Some(incoming)) => cached == incoming,
            _ => true,
        }
    }

    fn day_position(&self, day_id: &EntityId) -> Option<usize> {
        self.days.iter().position(|day| &day.id == day_id)
    }

    fn slot_path(&self, slot_id: &EntityId) -> Option<SlotPath> {
        let day_id = self.index.slot_day.get(slot_id)?;
        let day_pos = self.day_position(day_id)?;
        let slot_pos = self.days[day_pos]
            .time_slots
            .iter()
            .position(|slot| &slot.id == slot_id)?;
        Some((day_pos, slot_pos))
    }

    fn session_path(&self, session_id: &EntityId) -> Option<SessionPath> {
        let slot_id = self.index.session_slot.get(session_id)?;
        let (day_pos, slot_pos) = self.slot_path(slot_id)?;
        let session_pos = self.days[day_pos].time_slots[slot_pos]
            .sessions
            .iter()
            .position(|session| &session.id == session_id)?;
        Some((day_pos, slot_pos, session_pos))
    }

    fn agenda_path(&self, agenda_id: &EntityId) -> Option<AgendaPath> {
        let session_id = self.index.agenda_session.get(agenda_id)?;
        let (day_pos, slot_pos, session_pos) = self.session_path(session_id)?;
        let agenda_pos = self.days[day_pos].time_slots[slot_pos].sessions[session_pos]
            .agendas
            .iter()
            .position(|agenda| &agenda.id == agenda_id)?;
        Some((day_pos, slot_pos, session_pos, agenda_pos))
    }

    fn session_mut(&mut self, session_id: &EntityId) -> Option<&mut Session> {
        let (day_pos, slot_pos, session_pos) = self.session_path(session_id)?;
        Some(&mut self.days[day_pos].time_slots[slot_pos].sessions[session_pos])
    }

    fn prune_selection(&mut self) {
        let stale_day = self
            .current_day
            .as_ref()
            .is_some_and(|id| self.day_position(id).is_none());
        if stale_day {
            self.current_day = None;
        }
        let stale_session = self
            .current_session
            .as_ref()
            .is_some_and(|id| self.session_path(id).is_none());
        if stale_session {
            self.current_session = None;
        }
    }
}
