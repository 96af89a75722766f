//! Pure convergence logic: no filesystem, network, or process access.
//!
//! Everything here operates on in-memory text and structures so that the
//! check/fix semantics can be tested without touching a real installation.

pub mod constants;
pub mod layout;
pub mod manifest;
pub mod themes;
pub mod types;
