#![allow(dead_code)]

use async_trait::async_trait;
use exam_portal_admin::dto::admin_dto::{EmailPayload, UpdateAdminPayload};
use exam_portal_admin::dto::ai_dto::{AssessRequest, AssessResponse};
use exam_portal_admin::error::{Error, Result};
use exam_portal_admin::models::admin::AdminAccount;
use exam_portal_admin::models::candidate::ExtractedMcq;
use exam_portal_admin::models::file::FilePayload;
use exam_portal_admin::services::http::{Endpoint, FormBody};
use exam_portal_admin::services::ports::{
    AdminApi, AssessmentApi, ExtractionApi, FormTransport, UploadApi,
};
use exam_portal_admin::storage::SessionStore;
use mockall::mock;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

mock! {
    pub Transport {}

    #[async_trait]
    impl FormTransport for Transport {
        async fn send(&self, endpoint: &Endpoint, body: FormBody) -> Result<JsonValue>;
    }
}

mock! {
    pub Uploads {}

    #[async_trait]
    impl UploadApi for Uploads {
        async fn upload(&self, file: FilePayload) -> Result<String>;
    }
}

mock! {
    pub Extraction {}

    #[async_trait]
    impl ExtractionApi for Extraction {
        async fn extract_mcqs(&self, image: FilePayload) -> Result<Vec<ExtractedMcq>>;
    }
}

mock! {
    pub Assessment {}

    #[async_trait]
    impl AssessmentApi for Assessment {
        async fn assess(&self, request: &AssessRequest) -> Result<AssessResponse>;
    }
}

mock! {
    pub Admins {}

    #[async_trait]
    impl AdminApi for Admins {
        async fn list_admins(&self) -> Result<Vec<AdminAccount>>;
        async fn get_admin(&self, admin_id: &str) -> Result<Option<AdminAccount>>;
        async fn update_admin(
            &self,
            admin_id: &str,
            payload: &UpdateAdminPayload,
        ) -> Result<Option<AdminAccount>>;
        async fn send_email(&self, email: &EmailPayload) -> Result<()>;
    }
}

pub fn server_error(message: &str) -> Error {
    Error::Api {
        status: 500,
        message: Some(message.to_string()),
    }
}

pub fn png(name: &str) -> FilePayload {
    FilePayload::new(name, vec![0x89, b'P', b'N', b'G'])
}

pub fn logged_in_session() -> SessionStore {
    let session = SessionStore::in_memory();
    session.set_auth_token("token-123").expect("set token");
    session
}

pub fn admin(admin_id: &str, email: &str, expiry: Option<&str>, creator: Option<i64>) -> AdminAccount {
    AdminAccount {
        admin_id: admin_id.to_string(),
        email: Some(email.to_string()),
        expiry_date: expiry.map(str::to_string),
        created_by_admin_id: creator,
        ..AdminAccount::default()
    }
}

/// Upload fake whose responses are released by the test, keyed by file name.
#[derive(Default)]
pub struct GatedUploads {
    started: AtomicUsize,
    gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
}

impl GatedUploads {
    pub fn gate(&self, file_name: &str) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(file_name.to_string(), rx);
        tx
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadApi for GatedUploads {
    async fn upload(&self, file: FilePayload) -> Result<String> {
        let gate = self.gates.lock().unwrap().remove(&file.file_name);
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| Error::Internal("gate dropped".to_string())),
            None => Ok(format!("https://cdn.test/{}", file.file_name)),
        }
    }
}

/// Assessment fake that holds a request open until the test releases it.
/// Requests whose question stem has no gate answer at once.
#[derive(Default)]
pub struct GatedAssessment {
    started: AtomicUsize,
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<AssessResponse>>>>,
}

impl GatedAssessment {
    pub fn gate(&self, question: &str) -> oneshot::Sender<Result<AssessResponse>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(question.to_string(), rx);
        tx
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssessmentApi for GatedAssessment {
    async fn assess(&self, request: &AssessRequest) -> Result<AssessResponse> {
        let stem = request.mcq.lines().next().unwrap_or_default().to_string();
        let gate = self.gates.lock().unwrap().remove(&stem);
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(Error::Internal("gate dropped".to_string()))),
            None => Ok(AssessResponse {
                difficulty: Some("easy".to_string()),
                answer: Some("a".to_string()),
                ..AssessResponse::default()
            }),
        }
    }
}

pub async fn wait_for(mut ready: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if ready() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
