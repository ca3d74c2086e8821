//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Validate caller input at the boundary, before it reaches the store.

pub mod approval_service;
