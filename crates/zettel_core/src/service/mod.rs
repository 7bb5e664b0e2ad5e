//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate catalog, store and link calls into the normalization phases.
//! - Keep the CLI decoupled from filesystem and format details.

pub mod front_matter_service;
pub mod identifier;
pub mod pipeline;
pub mod rename_service;
