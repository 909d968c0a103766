use crate::dto::content_dto::UploadResponse;
use crate::error::Result;
use crate::models::file::FilePayload;
use crate::services::http::{ApiClient, Endpoint, MultipartBody};
use crate::services::ports::UploadApi;
use async_trait::async_trait;

pub const UPLOAD_ENDPOINT: Endpoint = Endpoint::api("/upload");

#[derive(Clone)]
pub struct ContentService {
    client: ApiClient,
}

impl ContentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UploadApi for ContentService {
    async fn upload(&self, file: FilePayload) -> Result<String> {
        let name = file.file_name.clone();
        let size = file.len();
        let body = MultipartBody::default().file("file", file);
        let response: UploadResponse = self.client.post_multipart(&UPLOAD_ENDPOINT, body).await?;
        tracing::info!(file = %name, size, url = %response.url, "Uploaded file");
        Ok(response.url)
    }
}
