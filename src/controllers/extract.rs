use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::extract::{ExtractRequest, ExtractResponse, ExtractService, ExtractServiceApi},
    error::AppResult,
};

pub struct ExtractController {
    extract_service: Arc<ExtractService>,
}

impl ExtractController {
    pub fn new(extract_service: Arc<ExtractService>) -> Self {
        Self { extract_service }
    }

    /// POST /extract - Extract article title and body chunks from a URL
    pub async fn extract(
        State(controller): State<Arc<ExtractController>>,
        Json(request): Json<ExtractRequest>,
    ) -> AppResult<Json<ExtractResponse>> {
        let content = controller.extract_service.extract(&request.url).await?;
        Ok(Json(content))
    }
}
