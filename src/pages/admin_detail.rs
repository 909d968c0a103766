use crate::dto::admin_dto::UpdateAdminPayload;
use crate::error::{Error, Result};
use crate::models::admin::{AdminAccount, AdminStatus};
use crate::pages::{require_session, Redirect, ADMIN_LOGIN_ROUTE};
use crate::services::notification_service::Notifier;
use crate::services::ports::AdminApi;
use crate::storage::SessionStore;
use crate::utils::time::{parse_portal_date, to_input_date};
use crate::utils::validation::{is_valid_email, phone_digits, PHONE_DIGITS};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::{Validate, ValidationError};

fn message(code: &'static str, text: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(text.into());
    err
}

fn validate_email(raw: &str) -> std::result::Result<(), ValidationError> {
    if raw.trim().is_empty() {
        Err(message("required", "Email is required."))
    } else if !is_valid_email(raw) {
        Err(message("email", "Enter a valid email."))
    } else {
        Ok(())
    }
}

fn validate_mobile(raw: &str) -> std::result::Result<(), ValidationError> {
    if raw.is_empty() || raw.len() == PHONE_DIGITS {
        Ok(())
    } else {
        Err(message("mobile", "Mobile number must be 10 digits."))
    }
}

fn validate_dates(form: &AdminEditForm) -> std::result::Result<(), ValidationError> {
    match (
        parse_portal_date(&form.start_date),
        parse_portal_date(&form.expiry_date),
    ) {
        (Some(start), Some(expiry)) if start > expiry => Err(message(
            "dates",
            "Expiry Date must be after Start Date.",
        )),
        _ => Ok(()),
    }
}

/// Editable copy of an admin record. Dates are held as `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_dates"))]
pub struct AdminEditForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_mobile"))]
    pub mobile_number: String,
    pub whatsapp_number: String,
    pub address: String,
    pub role: String,
    pub course: String,
    pub hod_name: String,
    pub start_date: String,
    pub expiry_date: String,
}

fn validate_name(raw: &str) -> std::result::Result<(), ValidationError> {
    if raw.trim().is_empty() {
        Err(message("required", "Name is required."))
    } else {
        Ok(())
    }
}

impl AdminEditForm {
    pub fn from_admin(admin: &AdminAccount) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: text(&admin.name),
            email: text(&admin.email),
            mobile_number: text(&admin.mobile_number),
            whatsapp_number: text(&admin.whatsapp_number),
            address: text(&admin.address),
            role: text(&admin.role),
            course: text(&admin.course),
            hod_name: text(&admin.hod_name),
            start_date: to_input_date(admin.start_date.as_deref()),
            expiry_date: to_input_date(admin.expiry_date.as_deref()),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "Email" => self.email = value.to_string(),
            "mobileNumber" => self.mobile_number = phone_digits(value),
            "whatsappNumber" => self.whatsapp_number = phone_digits(value),
            "address" => self.address = value.to_string(),
            "role" => self.role = value.to_string(),
            "Course" => self.course = value.to_string(),
            "HodName" => self.hod_name = value.to_string(),
            "StartDate" => self.start_date = value.to_string(),
            "ExpiryDate" => self.expiry_date = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    /// Empty dates are sent as null.
    pub fn payload(&self, admin_id: &str) -> UpdateAdminPayload {
        let date = |v: &str| Some(v.to_string()).filter(|d| !d.is_empty());
        UpdateAdminPayload {
            admin_id: admin_id.to_string(),
            name: self.name.clone(),
            email: self.email.trim().to_string(),
            mobile_number: self.mobile_number.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            address: self.address.clone(),
            role: self.role.clone(),
            course: self.course.clone(),
            hod_name: self.hod_name.clone(),
            start_date: date(&self.start_date),
            expiry_date: date(&self.expiry_date),
        }
    }
}

/// One admin's profile, with an edit mode that saves through `PUT`.
pub struct AdminDetailPage {
    admin_id: String,
    admin: Option<AdminAccount>,
    form: AdminEditForm,
    editing: bool,
    error: Option<String>,
    api: Arc<dyn AdminApi>,
    notifier: Arc<dyn Notifier>,
}

impl AdminDetailPage {
    pub fn mount(
        admin_id: &str,
        api: Arc<dyn AdminApi>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> std::result::Result<Self, Redirect> {
        require_session(&session, ADMIN_LOGIN_ROUTE)?;
        Ok(Self {
            admin_id: admin_id.to_string(),
            admin: None,
            form: AdminEditForm::default(),
            editing: false,
            error: None,
            api,
            notifier,
        })
    }

    pub async fn load(&mut self) -> Result<&AdminAccount> {
        self.error = None;
        match self.api.get_admin(&self.admin_id).await {
            Ok(Some(admin)) => {
                self.form = AdminEditForm::from_admin(&admin);
                Ok(&*self.admin.insert(admin))
            }
            Ok(None) => {
                self.admin = None;
                self.error = Some("Admin not found".to_string());
                Err(Error::BadRequest("Admin not found".to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, admin_id = %self.admin_id, "Failed to load admin");
                self.error = Some(e.user_message("Failed to load admin details."));
                Err(e)
            }
        }
    }

    pub fn admin(&self) -> Option<&AdminAccount> {
        self.admin.as_ref()
    }

    pub fn form(&self) -> &AdminEditForm {
        &self.form
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start_edit(&mut self) {
        if let Some(admin) = &self.admin {
            self.form = AdminEditForm::from_admin(admin);
            self.editing = true;
        }
    }

    pub fn cancel_edit(&mut self) {
        if let Some(admin) = &self.admin {
            self.form = AdminEditForm::from_admin(admin);
        }
        self.editing = false;
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.form.set_field(name, value)
    }

    pub fn status(&self, now: DateTime<Utc>) -> Option<AdminStatus> {
        self.admin.as_ref().map(|a| a.status_at(now))
    }

    pub fn days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        self.admin.as_ref().and_then(|a| a.days_left(now))
    }

    /// Validates and saves the edit. The stored record takes the server's
    /// copy when one comes back, otherwise what was sent.
    pub async fn save(&mut self) -> Result<()> {
        if let Err(e) = self.form.validate() {
            let err = Error::from(e);
            self.notifier.error(&err.user_message("Invalid admin details."));
            return Err(err);
        }

        let payload = self.form.payload(&self.admin_id);
        let updated = match self.api.update_admin(&self.admin_id, &payload).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::error!(error = %e, admin_id = %self.admin_id, "Admin update failed");
                self.notifier
                    .error(&e.user_message("Failed to update admin."));
                return Err(e);
            }
        };

        let updated = updated.unwrap_or_else(|| AdminAccount::from(payload));
        match self.admin.as_mut() {
            Some(admin) => admin.merge(updated),
            None => self.admin = Some(updated),
        }
        self.editing = false;
        self.notifier.success("Admin updated successfully.");
        Ok(())
    }
}
