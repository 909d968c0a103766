use crate::dto::ai_dto::{AssessRequest, AssessResponse, ExtractResponse};
use crate::error::{Error, Result};
use crate::models::candidate::ExtractedMcq;
use crate::models::file::FilePayload;
use crate::services::http::{ApiClient, Endpoint, MultipartBody};
use crate::services::ports::{AssessmentApi, ExtractionApi};
use crate::utils::mcq_markdown::parse_mcq_markdown;
use async_trait::async_trait;

pub const EXTRACT_ENDPOINT: Endpoint = Endpoint::ai("/api/extract-mcqs");
pub const ASSESS_ENDPOINT: Endpoint = Endpoint::ai("/api/assess-difficulty");

/// Client for the external OCR/LLM service that reads question images and
/// grades questions.
#[derive(Clone)]
pub struct AIService {
    client: ApiClient,
}

impl AIService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Structured `mcqs` win over markdown when the service sends both.
pub fn normalize_extraction(response: ExtractResponse) -> Vec<ExtractedMcq> {
    match response {
        ExtractResponse {
            mcqs: Some(mcqs), ..
        } if !mcqs.is_empty() => mcqs.into_iter().map(|m| m.into_extracted()).collect(),
        ExtractResponse {
            mcq_markdown: Some(markdown),
            ..
        } => parse_mcq_markdown(&markdown),
        _ => Vec::new(),
    }
}

#[async_trait]
impl ExtractionApi for AIService {
    async fn extract_mcqs(&self, image: FilePayload) -> Result<Vec<ExtractedMcq>> {
        image.ensure_image()?;
        let body = MultipartBody::default().file("image", image);
        let response: ExtractResponse = self.client.post_multipart(&EXTRACT_ENDPOINT, body).await?;
        let mcqs = normalize_extraction(response);
        tracing::info!("Extraction returned {} questions", mcqs.len());
        Ok(mcqs)
    }
}

#[async_trait]
impl AssessmentApi for AIService {
    async fn assess(&self, request: &AssessRequest) -> Result<AssessResponse> {
        if request.mcq.trim().is_empty() {
            return Err(Error::BadRequest("Question text is empty".to_string()));
        }
        let response: AssessResponse = self.client.post_json(&ASSESS_ENDPOINT, request).await?;
        tracing::info!(
            difficulty = ?response.difficulty,
            answer = ?response.answer,
            topic = ?response.topic,
            "Assessment received"
        );
        Ok(response)
    }
}
