//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (ChatMessage, Command, Reply, Outcome)
//! - Traits: Abstractions for infrastructure (ChatPort, Uploader)

pub mod entities;
pub mod traits;
