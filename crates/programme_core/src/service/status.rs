//! Loading and last-error bookkeeping shared by services.
//!
//! # Invariants
//! - `is_loading` is true while at least one operation is in flight.
//! - The in-flight count is decremented on every exit path, including
//!   early returns and dropped futures.
//! - `last_error` is cleared when an operation starts and set when it fails.

use log::warn;
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct ServiceStatus {
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl ServiceStatus {
    /// Marks one operation as started; dropping the guard marks it finished.
    pub fn begin(&self) -> InFlightGuard<'_> {
        *self.last_error_slot() = None;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard { status: self }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error_slot().clone()
    }

    pub fn record_failure(&self, operation: &str, err: &impl Display) {
        warn!("event={operation} module=service status=error error={err}");
        *self.last_error_slot() = Some(err.to_string());
    }

    /// Forgets the last failure. In-flight operations keep counting.
    pub fn clear_error(&self) {
        *self.last_error_slot() = None;
    }

    fn last_error_slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decrements the in-flight count on drop.
#[must_use = "the operation counts as finished as soon as the guard is dropped"]
pub struct InFlightGuard<'a> {
    status: &'a ServiceStatus,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.status.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
