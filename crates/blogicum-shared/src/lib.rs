//! # Blogicum Shared
//!
//! Wire types shared by the server and its clients: submitted forms, rendered
//! view documents and error bodies.

pub mod dto;
pub mod response;
pub mod view;

pub use response::{ErrorResponse, FieldErrors};
