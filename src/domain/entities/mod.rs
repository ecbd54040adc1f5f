//! Domain entities - Core business objects

pub mod command;
pub mod message;
pub mod outcome;
pub mod reply;

pub use command::{Command, CommandHandler, CommandRegistry};
pub use message::{Args, ChatMessage, FormData};
pub use outcome::{ChatPost, Outcome, BOT_SENDER};
pub use reply::{ImageReply, MessageReply, Reply};
