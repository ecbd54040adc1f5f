//! Command dispatch - parsing, routing and response normalization

pub mod dispatcher;
pub mod normalizer;
pub mod parser;

pub use dispatcher::CommandDispatcher;
pub use normalizer::ResponseNormalizer;
pub use parser::{CommandLine, CommandParser};
