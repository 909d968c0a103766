use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::file::FilePayload;
use crate::storage::SessionStore;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;

/// Which host an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The CRUD backend at `PORTAL_API_BASE_URL`.
    Api,
    /// The extraction/assessment service at `AI_SERVICE_URL`.
    AiService,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub backend: Backend,
    pub path: Cow<'static, str>,
}

impl Endpoint {
    pub const fn api(path: &'static str) -> Self {
        Self {
            backend: Backend::Api,
            path: Cow::Borrowed(path),
        }
    }

    pub const fn ai(path: &'static str) -> Self {
        Self {
            backend: Backend::AiService,
            path: Cow::Borrowed(path),
        }
    }

    pub fn api_owned(path: String) -> Self {
        Self {
            backend: Backend::Api,
            path: Cow::Owned(path),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, FilePayload)>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, name: &str, file: FilePayload) -> Self {
        self.files.push((name.to_string(), file));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_form(self) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for (name, file) in self.files {
            let part = multipart::Part::bytes(file.bytes.to_vec())
                .file_name(file.file_name)
                .mime_str(&file.mime_type)?;
            form = form.part(name, part);
        }
        Ok(form)
    }
}

/// What a form page hands to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum FormBody {
    Json(JsonValue),
    Multipart(MultipartBody),
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_base: String,
    ai_base: String,
    session: Option<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Option<SessionStore>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_base: config.api_base_url.clone(),
            ai_base: config.ai_service_url.clone(),
            session,
        })
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        let base = match endpoint.backend {
            Backend::Api => &self.api_base,
            Backend::AiService => &self.ai_base,
        };
        format!("{}/{}", base, endpoint.path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.as_ref().and_then(SessionStore::auth_token) {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!("GET {}", url);
        let response = self.authorize(self.client.get(&url)).send().await?;
        read_json(response).await
    }

    pub async fn post_json<B, T>(&self, endpoint: &Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);
        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn put_json<B, T>(&self, endpoint: &Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        tracing::debug!("PUT {}", url);
        let response = self
            .authorize(self.client.put(&url))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: MultipartBody,
    ) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(files = body.files.len(), "POST multipart {}", url);
        let response = self
            .authorize(self.client.post(&url))
            .multipart(body.into_form()?)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn send_form(&self, endpoint: &Endpoint, body: FormBody) -> Result<JsonValue> {
        match body {
            FormBody::Json(value) => self.post_json(endpoint, &value).await,
            FormBody::Multipart(parts) => self.post_multipart(endpoint, parts).await,
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body);
        tracing::warn!(status = status.as_u16(), ?message, "Backend rejected request");
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    // Acknowledgements without a body decode as JSON null.
    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    Ok(serde_json::from_str(body)?)
}

/// The `message` (or `error`) field of a JSON error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(JsonValue::as_str))
        .map(str::to_string)
}
