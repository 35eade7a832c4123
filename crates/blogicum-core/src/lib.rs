//! # Blogicum Core
//!
//! The domain layer of the blog.
//! This crate contains the entities, the visibility and pagination rules and the
//! ports that storage and auth adapters implement. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use error::DomainError;
