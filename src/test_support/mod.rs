//! Shared helpers for unit tests.

pub mod scripted_source;
pub mod socket_guard;
