use crate::error::{Error, Result};
use crate::models::admin::{AdminAccount, AdminStatus};
use crate::pages::form::{Encoding, FormDescriptor, FormModel, FormPage};
use crate::pages::{require_session, Confirm, Redirect, LOGIN_ROUTE};
use crate::services::http::{Endpoint, FormBody};
use crate::services::notification_service::Notifier;
use crate::services::ports::{AdminApi, FormTransport};
use crate::storage::SessionStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

static DELETE_ADMIN_FORM: FormDescriptor = FormDescriptor {
    name: "delete-admin",
    endpoint: Endpoint::api("/superadmin/deleteadmin"),
    encoding: Encoding::Json,
    fields: &["AdminId", "reason"],
    success_message: "Admin Removed Successfully",
    failure_message: "Something went wrong.",
    counter: None,
    reset_on_success: true,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct DeleteAdminForm {
    #[serde(rename = "AdminId")]
    #[validate(length(min = 1, message = "Admin ID is required"))]
    pub admin_id: String,
    #[validate(length(min = 1, message = "A reason is required"))]
    pub reason: String,
}

impl FormModel for DeleteAdminForm {
    fn descriptor() -> &'static FormDescriptor {
        &DELETE_ADMIN_FORM
    }

    fn fresh() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "AdminId" => self.admin_id = value.trim().to_string(),
            "reason" => self.reason = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        Ok(FormBody::Json(serde_json::to_value(self)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Expired,
    NoExpiry,
    /// Accounts created by another admin.
    HasCreator,
    /// Accounts with no creator.
    Root,
}

impl StatusFilter {
    pub fn matches(&self, admin: &AdminAccount, now: DateTime<Utc>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => admin.status_at(now) == AdminStatus::Active,
            StatusFilter::Expired => admin.status_at(now) == AdminStatus::Expired,
            StatusFilter::NoExpiry => admin.status_at(now) == AdminStatus::NoExpiry,
            StatusFilter::HasCreator => !admin.is_root(),
            StatusFilter::Root => admin.is_root(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "expired" => Ok(StatusFilter::Expired),
            "null" | "no-expiry" | "noexpiry" => Ok(StatusFilter::NoExpiry),
            "has-creator" | "hascreator" => Ok(StatusFilter::HasCreator),
            "root" => Ok(StatusFilter::Root),
            other => Err(format!("Unknown status filter: {}", other)),
        }
    }
}

/// Case-insensitive substring match on admin id or email. An empty term
/// matches every account.
pub fn matches_search(admin: &AdminAccount, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    admin.admin_id.to_lowercase().contains(&term)
        || admin
            .email
            .as_deref()
            .map(|e| e.to_lowercase().contains(&term))
            .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Admin list with search, status filter and the delete flow.
pub struct AdminDirectoryPage {
    admins: Vec<AdminAccount>,
    search: String,
    filter: StatusFilter,
    delete: FormPage<DeleteAdminForm>,
    api: Arc<dyn AdminApi>,
    notifier: Arc<dyn Notifier>,
}

impl AdminDirectoryPage {
    pub fn mount(
        transport: Arc<dyn FormTransport>,
        api: Arc<dyn AdminApi>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> std::result::Result<Self, Redirect> {
        require_session(&session, LOGIN_ROUTE)?;
        Ok(Self {
            admins: Vec::new(),
            search: String::new(),
            filter: StatusFilter::All,
            delete: FormPage::new(transport, notifier.clone(), session),
            api,
            notifier,
        })
    }

    /// Reloads the list. On failure the previous list stays on screen.
    pub async fn refresh(&mut self) -> Result<usize> {
        match self.api.list_admins().await {
            Ok(admins) => {
                self.admins = admins;
                Ok(self.admins.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load admin list");
                self.notifier.error("Failed to load admin list");
                Err(e)
            }
        }
    }

    pub fn admins(&self) -> &[AdminAccount] {
        &self.admins
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// The accounts passing both search and filter, statuses taken at `now`.
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&AdminAccount> {
        self.admins
            .iter()
            .filter(|a| matches_search(a, &self.search) && self.filter.matches(a, now))
            .collect()
    }

    pub fn status_of(&self, admin: &AdminAccount, now: DateTime<Utc>) -> AdminStatus {
        admin.status_at(now)
    }

    /// The account that created `admin`, when it is in the loaded list.
    pub fn creator_of(&self, admin: &AdminAccount) -> Option<&AdminAccount> {
        let creator = admin.created_by_admin_id?;
        self.admins.iter().find(|a| a.id == Some(creator))
    }

    pub fn delete_form(&self) -> &DeleteAdminForm {
        self.delete.model()
    }

    pub fn update_delete_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.delete.update_field(name, value)
    }

    /// Asks for confirmation, posts the delete and reloads the list.
    pub async fn delete_admin(&mut self, confirm: &dyn Confirm) -> Result<DeleteOutcome> {
        let admin_id = self.delete.model().admin_id.clone();
        if admin_id.is_empty() {
            return Err(Error::BadRequest("Admin ID is required".to_string()));
        }

        let prompt = format!("Are you sure you want to delete admin with ID: {}?", admin_id);
        if !confirm.confirm(&prompt) {
            self.notifier.info("Admin deletion cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.delete.submit().await?;
        tracing::info!(admin_id = %admin_id, "Admin deleted");
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Admin list not refreshed after delete");
        }
        Ok(DeleteOutcome::Deleted)
    }
}
