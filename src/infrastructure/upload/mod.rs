//! Media upload client for the LAN file service

use std::time::Duration;

use reqwest::blocking::multipart;
use serde_json::Value;

use crate::application::errors::UploadError;
use crate::domain::traits::{UploadedFile, Uploader};
use crate::infrastructure::config::UploadConfig;

/// Multipart POST uploader
///
/// The file service answers `{"urls": [...]}` for batch-capable
/// deployments and `{"url": ...}` for older ones; both are accepted.
pub struct HttpUploader {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self, UploadError> {
        Self::new(
            config.url.as_str(),
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

impl Uploader for HttpUploader {
    fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadedFile, UploadError> {
        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()?
            .error_for_status()?;

        let body: Value = response.json()?;
        let url = extract_url(&body).ok_or_else(|| {
            UploadError::BadResponse("no file URL in upload response".to_string())
        })?;

        Ok(UploadedFile {
            url: url.to_string(),
        })
    }
}

fn extract_url(body: &Value) -> Option<&str> {
    body.get("urls")
        .and_then(Value::as_array)
        .and_then(|urls| urls.first())
        .and_then(Value::as_str)
        .or_else(|| body.get("url").and_then(Value::as_str))
}
