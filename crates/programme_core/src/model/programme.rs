//! Programme, day and time-slot records.
//!
//! # Invariants
//! - Days are ordered by `day_number` ascending.
//! - A day's time slots are ordered by `start_time` ascending.
//! - A slot's sessions are ordered by effective start ascending.
//! - All sorts are stable, so equal keys keep arrival order.

use crate::model::ids::EntityId;
use crate::model::interval::TimeInterval;
use crate::model::session::Session;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Full multi-day schedule for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Programme {
    pub event_id: EntityId,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Programme {
    pub fn new(event_id: impl Into<EntityId>) -> Self {
        Self {
            event_id: event_id.into(),
            is_published: false,
            published_at: None,
            days: Vec::new(),
        }
    }
}

/// One numbered day of a programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EntityId>,
    /// 1-based and unique within one programme.
    pub day_number: u32,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Day {
    pub fn new(
        id: impl Into<EntityId>,
        event_id: impl Into<EntityId>,
        day_number: u32,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: Some(event_id.into()),
            day_number,
            date,
            title: None,
            description: None,
            time_slots: Vec::new(),
        }
    }

    pub fn sort_time_slots(&mut self) {
        self.time_slots.sort_by_key(|slot| slot.start_time);
    }

    /// Sorts every ordered list below this day.
    pub fn sort_recursive(&mut self) {
        for slot in &mut self.time_slots {
            slot.sort_recursive();
        }
        self.sort_time_slots();
    }

    /// Points every slot, session and agenda below this day at its holder.
    pub fn link_children(&mut self) {
        for slot in &mut self.time_slots {
            slot.programme_day_id = Some(self.id.clone());
            slot.link_children();
        }
    }
}

/// Bounded period of a day hosting one or more sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programme_day_id: Option<EntityId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl TimeSlot {
    pub fn new(
        id: impl Into<EntityId>,
        programme_day_id: impl Into<EntityId>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            programme_day_id: Some(programme_day_id.into()),
            start_time,
            end_time,
            title: None,
            description: None,
            sessions: Vec::new(),
        }
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_time, self.end_time)
    }

    pub fn sort_sessions(&mut self) {
        let slot_start = self.start_time;
        self.sessions
            .sort_by_key(|session| session.effective_start(slot_start));
    }

    pub fn sort_recursive(&mut self) {
        for session in &mut self.sessions {
            session.sort_agendas();
        }
        self.sort_sessions();
    }

    /// Points every session and agenda below this slot at its holder.
    pub fn link_children(&mut self) {
        for session in &mut self.sessions {
            session.time_slot_id = Some(self.id.clone());
            session.programme_day_id = self.programme_day_id.clone();
            session.link_agendas();
        }
    }
}

/// Sorts days by `day_number`, keeping arrival order for duplicates.
pub fn sort_days(days: &mut [Day]) {
    days.sort_by_key(|day| day.day_number);
}

#[cfg(test)]
mod tests {
    use super::{sort_days, Day, TimeSlot};
    use crate::model::session::{Session, SessionType};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid fixture date")
    }

    #[test]
    fn sort_days_orders_by_day_number() {
        let mut days = vec![
            Day::new("d3", "evt", 3, date()),
            Day::new("d1", "evt", 1, date()),
            Day::new("d2", "evt", 2, date()),
        ];
        sort_days(&mut days);
        let numbers: Vec<u32> = days.iter().map(|day| day.day_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn sessions_without_override_sort_at_slot_start() {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 5, 4, 11, 0, 0).unwrap();
        let mut slot = TimeSlot::new("slot-1", "d1", start, end);

        let mut late = Session::new("late", "slot-1", "Late", SessionType::Panel);
        late.start_time = Some(Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap());
        let inherited = Session::new("inherit", "slot-1", "Inherit", SessionType::Keynote);
        slot.sessions = vec![late, inherited];

        slot.sort_sessions();
        assert_eq!(slot.sessions[0].id.as_str(), "inherit");
        assert_eq!(slot.sessions[1].id.as_str(), "late");
    }
}
