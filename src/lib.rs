pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod pages;
pub mod services;
pub mod storage;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::pages::{
    admin_create::CreateAdminPage, admin_detail::AdminDetailPage,
    admin_directory::AdminDirectoryPage, chapter_wise::ChapterWisePage,
    extractor::ExtractorPage, login::LoginPage, previous_year::PreviousYearPage, Redirect,
};
use crate::services::{
    admin_service::AdminService,
    ai_service::AIService,
    content_service::ContentService,
    http::ApiClient,
    notification_service::{Notifier, TracingNotifier},
    ports::{AdminApi, AssessmentApi, ExtractionApi, FormTransport, UploadApi},
};
use crate::storage::{FileStore, SessionStore};
use std::sync::Arc;

/// Every collaborator a page needs, wired once per process.
#[derive(Clone)]
pub struct Portal {
    pub session: SessionStore,
    pub transport: Arc<dyn FormTransport>,
    pub uploads: Arc<dyn UploadApi>,
    pub extraction: Arc<dyn ExtractionApi>,
    pub assessment: Arc<dyn AssessmentApi>,
    pub admins: Arc<dyn AdminApi>,
    pub notifier: Arc<dyn Notifier>,
}

impl Portal {
    /// Session storage lives in the configured file; notices go to the log.
    pub fn new(config: &Config) -> Result<Self> {
        let session = SessionStore::new(Arc::new(FileStore::new(config.storage_path.clone())));
        Self::with_session(config, session, Arc::new(TracingNotifier))
    }

    pub fn with_session(
        config: &Config,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let client = ApiClient::new(config, Some(session.clone()))?;
        let ai = Arc::new(AIService::new(client.clone()));

        Ok(Self {
            session,
            transport: Arc::new(client.clone()),
            uploads: Arc::new(ContentService::new(client.clone())),
            extraction: ai.clone(),
            assessment: ai,
            admins: Arc::new(AdminService::new(client)),
            notifier,
        })
    }

    pub fn chapter_wise(&self) -> ChapterWisePage {
        ChapterWisePage::mount(
            self.transport.clone(),
            self.uploads.clone(),
            self.assessment.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }

    pub fn previous_year(&self) -> PreviousYearPage {
        PreviousYearPage::mount(
            self.transport.clone(),
            self.uploads.clone(),
            self.assessment.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }

    pub fn extractor(&self) -> ExtractorPage {
        ExtractorPage::mount(
            self.extraction.clone(),
            self.assessment.clone(),
            self.transport.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }

    pub fn login(&self) -> LoginPage {
        LoginPage::mount(
            self.transport.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }

    pub fn create_admin(&self) -> std::result::Result<CreateAdminPage, Redirect> {
        CreateAdminPage::mount(
            self.transport.clone(),
            self.admins.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }

    pub fn admin_directory(&self) -> std::result::Result<AdminDirectoryPage, Redirect> {
        AdminDirectoryPage::mount(
            self.transport.clone(),
            self.admins.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }

    pub fn admin_detail(&self, admin_id: &str) -> std::result::Result<AdminDetailPage, Redirect> {
        AdminDetailPage::mount(
            admin_id,
            self.admins.clone(),
            self.notifier.clone(),
            self.session.clone(),
        )
    }
}
