//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: Message persistence
//! - Upload: Media upload client
//! - Adapters: Chat frontends

pub mod adapters;
pub mod config;
pub mod database;
pub mod upload;
