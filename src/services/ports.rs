//! Seams between pages and the network. Each trait has one reqwest-backed
//! implementation in this module's siblings.

use crate::dto::admin_dto::{EmailPayload, UpdateAdminPayload};
use crate::dto::ai_dto::{AssessRequest, AssessResponse};
use crate::error::Result;
use crate::models::admin::AdminAccount;
use crate::models::candidate::ExtractedMcq;
use crate::models::file::FilePayload;
use crate::services::http::{ApiClient, Endpoint, FormBody};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn send(&self, endpoint: &Endpoint, body: FormBody) -> Result<JsonValue>;
}

#[async_trait]
impl FormTransport for ApiClient {
    async fn send(&self, endpoint: &Endpoint, body: FormBody) -> Result<JsonValue> {
        self.send_form(endpoint, body).await
    }
}

#[async_trait]
pub trait UploadApi: Send + Sync {
    /// Stores a file and returns the URL it can be fetched from.
    async fn upload(&self, file: FilePayload) -> Result<String>;
}

#[async_trait]
pub trait ExtractionApi: Send + Sync {
    async fn extract_mcqs(&self, image: FilePayload) -> Result<Vec<ExtractedMcq>>;
}

#[async_trait]
pub trait AssessmentApi: Send + Sync {
    async fn assess(&self, request: &AssessRequest) -> Result<AssessResponse>;
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>>;
    async fn get_admin(&self, admin_id: &str) -> Result<Option<AdminAccount>>;
    async fn update_admin(
        &self,
        admin_id: &str,
        payload: &UpdateAdminPayload,
    ) -> Result<Option<AdminAccount>>;
    async fn send_email(&self, email: &EmailPayload) -> Result<()>;
}
