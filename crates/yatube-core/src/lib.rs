//! # Yatube Core
//!
//! The domain layer of Yatube.
//! This crate contains the records, ports, form validation and application
//! services with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod service;

pub use error::DomainError;
