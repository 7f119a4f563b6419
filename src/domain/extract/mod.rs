pub mod error;
pub mod service;

pub use error::ExtractionError;
pub use service::{ExtractService, ExtractServiceApi};

use serde::{Deserialize, Serialize};

/// Request for POST /extract
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

/// Article title plus its text split into readable chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chunks: Vec<String>,
}
