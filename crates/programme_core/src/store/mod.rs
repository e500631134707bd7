//! Cached programme state.
//!
//! The store is synchronous and owns no I/O; services lock it for the
//! duration of a single mutation and never across a remote call.

pub mod tree;

pub use tree::ProgrammeTree;
