//! Error taxonomy of the scheduling services.
//!
//! - `Remote`: the gateway failed; nothing was applied to the cache.
//! - `Precondition`: caller input was rejected before any remote call.
//! - `Decode`: the remote answered with a payload the normalizer rejected;
//!   nothing was applied to the cache.
//!
//! Update/delete targets missing from the cache are not errors: the remote
//! outcome is reported and cache propagation is skipped.

use crate::gateway::GatewayError;
use crate::model::EntityKind;
use crate::normalize::NormalizeError;
use thiserror::Error;

pub type ProgrammeResult<T> = Result<T, ProgrammeError>;

#[derive(Debug, Error)]
pub enum ProgrammeError {
    #[error("{0}")]
    Remote(#[from] GatewayError),
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
    #[error("unexpected remote payload: {0}")]
    Decode(#[from] NormalizeError),
    #[error("failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProgrammeError {
    /// Returns the gateway failure, if this error came from the remote.
    pub fn as_remote(&self) -> Option<&GatewayError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

/// Caller input rejected before a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("{kind} command requires `{field}`")]
    MissingIdentifier {
        kind: EntityKind,
        field: &'static str,
    },
    #[error("day number must be at least 1, got {0}")]
    InvalidDayNumber(u32),
    #[error("day number {day_number} is already used by day {existing_day_id}")]
    DuplicateDayNumber {
        day_number: u32,
        existing_day_id: String,
    },
}
