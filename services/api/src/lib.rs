//! services/api/src/lib.rs
//!
//! HTTP service for NotesVault: configuration, storage adapters and the
//! axum web layer around the `notes_vault_core` services.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
