//! Command dispatch and extension registry for a LAN chat server
//!
//! Chat lines starting with a sigil (`!` by default) are parsed into
//! command invocations, routed through a [`CommandRegistry`] filled in
//! by compiled-in extensions, and folded into canonical [`Outcome`]s a
//! host can act on without ever inspecting handler output.

pub mod application;
pub mod domain;
pub mod extensions;
pub mod infrastructure;

pub use application::dispatch::CommandDispatcher;
pub use application::services::ChatService;
pub use domain::entities::{
    Args, ChatMessage, ChatPost, CommandRegistry, FormData, Outcome, Reply,
};
pub use extensions::{load_extensions, ChatExtension, LoadReport};
