//! Domain traits - Abstractions for infrastructure implementations

pub mod port;
pub mod uploader;

pub use port::ChatPort;
pub use uploader::{UploadedFile, Uploader};
