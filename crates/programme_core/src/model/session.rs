//! Session and agenda records.
//!
//! # Invariants
//! - A session's agendas are ordered by `order` ascending.
//! - Speaker, moderator and panelists are weak references into the speaker
//!   directory; the session never owns speaker records.

use crate::model::ids::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fixed set of session kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Keynote,
    Panel,
    Break,
    Lunch,
    Tea,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keynote => "keynote",
            Self::Panel => "panel",
            Self::Break => "break",
            Self::Lunch => "lunch",
            Self::Tea => "tea",
        }
    }

    /// Parses the wire name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keynote" => Some(Self::Keynote),
            "panel" => Some(Self::Panel),
            "break" => Some(Self::Break),
            "lunch" => Some(Self::Lunch),
            "tea" => Some(Self::Tea),
            _ => None,
        }
    }
}

impl Display for SessionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduled activity inside a time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: EntityId,
    /// Owning slot. `None` only for echoes that omitted it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programme_day_id: Option<EntityId>,
    pub title: String,
    /// Serialized as `type` to match the remote schema.
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
    /// Overrides the slot start when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Overrides the slot end when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panelist_ids: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant_ids: Vec<EntityId>,
    #[serde(default)]
    pub agendas: Vec<Agenda>,
}

impl Session {
    pub fn new(
        id: impl Into<EntityId>,
        time_slot_id: impl Into<EntityId>,
        title: impl Into<String>,
        session_type: SessionType,
    ) -> Self {
        Self {
            id: id.into(),
            time_slot_id: Some(time_slot_id.into()),
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
            participant_ids: Vec::new(),
            agendas: Vec::new(),
        }
    }

    /// Start used for ordering inside a slot: the override, else the slot's.
    pub fn effective_start(&self, slot_start: DateTime<Utc>) -> DateTime<Utc> {
        self.start_time.unwrap_or(slot_start)
    }

    /// Returns whether `speaker_id` holds the speaker, moderator or a panelist seat.
    pub fn involves_speaker(&self, speaker_id: &EntityId) -> bool {
        self.speaker_id.as_ref() == Some(speaker_id)
            || self.moderator_id.as_ref() == Some(speaker_id)
            || self.panelist_ids.contains(speaker_id)
    }

    pub fn sort_agendas(&mut self) {
        self.agendas.sort_by_key(|agenda| agenda.order);
    }

    pub fn link_agendas(&mut self) {
        for agenda in &mut self.agendas {
            agenda.session_id = Some(self.id.clone());
        }
    }
}

/// Ordered sub-item of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<EntityId>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl Agenda {
    pub fn new(
        id: impl Into<EntityId>,
        session_id: impl Into<EntityId>,
        title: impl Into<String>,
        order: i64,
    ) -> Self {
        Self {
            id: id.into(),
            session_id: Some(session_id.into()),
            title: title.into(),
            description: None,
            order,
            duration_minutes: None,
        }
    }
}
