//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate entity store and relationship index calls into catalog
//!   operations with consistency guarantees.
//! - Keep request/CLI layers decoupled from storage details.

pub mod data_service;
