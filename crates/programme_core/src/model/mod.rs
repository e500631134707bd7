//! Canonical programme domain model.
//!
//! # Responsibility
//! - Define the one typed shape every wire representation decodes into.
//! - Own the ordering keys used by the tree store.
//!
//! # Invariants
//! - Every node is identified by a stable `EntityId`.
//! - Serializing a model value yields the snake_case wire shape the
//!   normalizer accepts, so decoding is idempotent.

pub mod ids;
pub mod interval;
pub mod programme;
pub mod session;
pub mod speaker;

use std::fmt::{Display, Formatter};

/// Kind tag used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Programme,
    Day,
    TimeSlot,
    Session,
    Agenda,
    Speaker,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Programme => "programme",
            Self::Day => "day",
            Self::TimeSlot => "time_slot",
            Self::Session => "session",
            Self::Agenda => "agenda",
            Self::Speaker => "speaker",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
