//! In-memory storage - used when no database is configured, and in tests.
//!
//! All repositories share one [`InMemoryStore`], which enforces the same
//! unique, foreign-key and cascade rules as the relational schema.

mod repositories;
mod store;

pub use repositories::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryLocationRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};
pub use store::InMemoryStore;
