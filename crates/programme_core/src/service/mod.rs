//! Use-case services over the remote gateway and the cached tree.
//!
//! # Responsibility
//! - Validate command input before any remote call.
//! - Decode remote echoes and propagate them into the cache.
//! - Track loading state and the last failure per service.
//!
//! # Invariants
//! - Remote calls are awaited without holding the cache lock.
//! - A failed call (remote, decode or precondition) leaves the cache untouched.
//! - Nothing is retried.

mod programme_service;
pub mod requests;
mod schedule_commands;
mod speaker_service;
pub mod status;

pub use programme_service::ProgrammeService;
pub use speaker_service::SpeakerService;

use crate::error::{PreconditionError, ProgrammeResult};
use crate::model::ids::EntityId;
use crate::model::EntityKind;
use log::{debug, info};
use status::ServiceStatus;
use std::future::Future;

/// Runs one service operation with loading/error bookkeeping.
pub(crate) async fn tracked<T>(
    status: &ServiceStatus,
    operation: &'static str,
    work: impl Future<Output = ProgrammeResult<T>>,
) -> ProgrammeResult<T> {
    let _in_flight = status.begin();
    debug!("event={operation} module=service status=start");
    let result = work.await;
    if let Err(err) = &result {
        status.record_failure(operation, err);
    }
    result
}

/// Rejects empty or placeholder identifiers.
pub(crate) fn ensure_identifier(
    kind: EntityKind,
    field: &'static str,
    id: &EntityId,
) -> Result<(), PreconditionError> {
    if id.is_placeholder() {
        return Err(PreconditionError::MissingIdentifier { kind, field });
    }
    Ok(())
}

pub(crate) fn log_cache_outcome(operation: &str, kind: EntityKind, id: &EntityId, applied: bool) {
    if applied {
        info!("event={operation} module=service status=ok kind={kind} id={id}");
    } else {
        debug!("event={operation} module=service status=skip reason=not_cached kind={kind} id={id}");
    }
}
