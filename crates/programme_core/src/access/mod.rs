//! Read-only access checks over an externally supplied auth snapshot.
//!
//! # Responsibility
//! - Answer permission and role membership questions.
//! - Decide where a navigation request goes given the current snapshot.
//!
//! # Invariants
//! - Nothing here computes grants; the snapshot is taken as given.
//! - Checks are infallible and never touch the network.

pub mod permissions;
pub mod route_guard;

pub use permissions::PermissionSet;
pub use route_guard::{guard_route, AuthSnapshot, RouteDecision, RouteRequirement};
