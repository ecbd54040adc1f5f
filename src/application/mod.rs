//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Dispatch: Command parsing, routing, response normalization
//! - Services: Business logic orchestration
//! - Errors: Domain-specific errors

pub mod dispatch;
pub mod errors;
pub mod services;
