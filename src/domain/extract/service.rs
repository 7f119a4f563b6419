use super::error::ExtractionError;
use super::ExtractResponse;
use crate::infrastructure::repositories::ContentExtractor;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

pub struct ExtractService {
    extractor: Arc<dyn ContentExtractor>,
}

impl ExtractService {
    pub fn new(extractor: Arc<dyn ContentExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
pub trait ExtractServiceApi: Send + Sync {
    /// Extract the readable article body behind `url`
    ///
    /// Failures here are reported to the client directly; they never fall
    /// back to canned audio.
    async fn extract(&self, url: &str) -> Result<ExtractResponse, ExtractionError>;
}

#[async_trait]
impl ExtractServiceApi for ExtractService {
    async fn extract(&self, url: &str) -> Result<ExtractResponse, ExtractionError> {
        let parsed = validate_url(url)?;

        tracing::info!(url = %parsed, "Extracting article content");

        let content = self.extractor.extract(parsed.as_str()).await?;

        tracing::info!(
            url = %parsed,
            title = %content.title,
            chunk_count = content.chunks.len(),
            "Article content extracted"
        );

        Ok(content)
    }
}

/// Only absolute http(s) URLs are handed to the extractor
fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ExtractionError::InvalidUrl(format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(ExtractionError::InvalidUrl("URL has no host".to_string())),
        other => Err(ExtractionError::InvalidUrl(format!(
            "Unsafe protocol: {}",
            other
        ))),
    }
}
