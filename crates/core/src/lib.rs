//! `civicdesk-core`: shared building blocks for the admin console.
//!
//! This crate contains **pure** primitives (identifiers and the validation error
//! model). It has no runtime or UI concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AdminId, NotificationId, RequestId};
