//! Hosted-store implementations of the port traits.
//!
//! One REST client implements all three store ports; each submodule
//! covers the tables for one concern.

mod client;
mod content;
mod forum;
mod profiles;

pub use client::StoreClient;
