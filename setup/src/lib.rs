//! Idempotent setup and validation for Composer-managed WordPress projects.
//!
//! The target layout keeps WordPress core under `wp/`, managed as a Composer
//! dependency, with the project root holding `composer.json`,
//! `wp-config.php` and a thin front controller. The tool converges a project
//! on that layout across three phases (manifest, configuration constants,
//! environment verification), in one of two modes: Check reports deviations
//! and exits non-zero, Fix applies corrections and re-validates.
//!
//! # Architecture
//!
//! - [`core`] holds the pure logic: the target layout, the constant-store
//!   parser/patcher, manifest edits and theme resolution. Nothing in it
//!   performs I/O.
//! - [`io`] holds the side effects: file persistence, subprocess execution,
//!   template download, and the trait seams for the external collaborators
//!   (package manager, application runtime, database probe, user input).
//! - [`phases`] wires both into the three-phase pipeline.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod phases;
pub mod report;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
