//! Error types shared by the domain and the storage ports.

use thiserror::Error;

/// A record that breaks a domain rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("title is required")]
    BlankTitle,

    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },

    #[error("invalid slug '{0}': use latin letters, digits, hyphen and underscore")]
    InvalidSlug(String),
}

/// Storage failures, as seen through the repository ports.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    /// The row to delete does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Unique or foreign-key rule violated.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}
