use crate::application::errors::UploadError;

/// A file accepted by the upload service
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// URL the file is now served from
    pub url: String,
}

/// Upload collaborator the normalizer hands raw image bytes to
///
/// Implementations are synchronous; the dispatch pipeline runs on a
/// blocking thread.
pub trait Uploader: Send + Sync {
    fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadedFile, UploadError>;
}
