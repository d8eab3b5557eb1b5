//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep FFI/CLI layers decoupled from file format details.

pub mod todo_service;
