//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`] — In-memory implementations of the [`port`](crate::port)
//!   traits with recorded call logs.
//! - [`domain`] — Builders for domain rows: modules, posts, profiles.

pub mod domain;
pub mod store;
