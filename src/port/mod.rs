//! Trait seams between the services and the hosted backend.
//!
//! Services depend on these traits rather than on the REST client
//! directly, so they can be exercised against in-memory doubles.

pub mod storage;
pub mod store;

pub use storage::ObjectStore;
pub use store::{CommunityStore, ContentStore, ForumStore};
