//! Event-programme scheduling engine.
//! Owns the cached programme tree, applies edits confirmed by the remote
//! store, and answers time and speaker conflict queries.

pub mod access;
pub mod config;
pub mod conflict;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod service;
pub mod store;

pub use access::{guard_route, AuthSnapshot, PermissionSet, RouteDecision, RouteRequirement};
pub use config::{ConfigError, HydrationMode, LoggingConfig, ProgrammeConfig};
pub use conflict::{
    check_speaker_conflicts, check_time_conflicts, resolve_session_interval, IntervalPolicy,
};
pub use error::{PreconditionError, ProgrammeError, ProgrammeResult};
pub use gateway::{
    ApiRoutes, GatewayError, GatewayResult, InMemoryGateway, Method, RecordedRequest,
    RemoteGateway,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::ids::EntityId;
pub use model::interval::TimeInterval;
pub use model::programme::{Day, Programme, TimeSlot};
pub use model::session::{Agenda, Session, SessionType};
pub use model::speaker::Speaker;
pub use model::EntityKind;
pub use normalize::{NormalizeError, NormalizeResult};
pub use service::requests::{
    AddParticipantRequest, CreateAgendaRequest, CreateDayRequest, CreateSessionRequest,
    CreateSpeakerRequest, CreateTimeSlotRequest, UpdateAgendaRequest, UpdateDayRequest,
    UpdateSessionRequest, UpdateSpeakerRequest, UpdateTimeSlotRequest,
};
pub use service::{ProgrammeService, SpeakerService};
pub use store::ProgrammeTree;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
