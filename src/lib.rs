//! Aula: client library and CLI for a course-hosting community platform.
//!
//! The platform keeps all state in a hosted relational store behind a
//! REST interface; this crate is the typed client side of it:
//!
//! - [`domain`] — content tree, forum, and profile types with validation
//! - [`projector`] — flattens the content tree into a positioned graph
//! - [`port`] — trait seams over the store and object storage
//! - [`store`] / [`storage`] — REST implementations of those seams
//! - [`webhook`] — virtual tutor chat and document ingestion
//! - [`service`] — use cases wired from the ports
//! - [`cli`] — the `aula` binary's commands

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod projector;
pub mod service;
pub mod storage;
pub mod store;
pub mod webhook;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
