//! # Blog Core
//!
//! The domain layer of the blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, ports, permission policies and pagination arithmetic.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod ports;
pub mod validation;

pub use error::{DomainError, RepoError, ValidationErrors};
