use crate::dto::admin_dto::EmailPayload;
use crate::error::{Error, Result};
use crate::models::admin::{DEFAULT_NAVBAR_COLOR, DEFAULT_SIDEBAR_COLOR, DEFAULT_TEXT_COLOR};
use crate::models::file::{FilePayload, MAX_LOGO_BYTES};
use crate::pages::form::{Encoding, FormDescriptor, FormModel, FormPage};
use crate::pages::{require_session, Redirect, LOGIN_ROUTE};
use crate::services::http::{Endpoint, FormBody, MultipartBody};
use crate::services::notification_service::Notifier;
use crate::services::ports::{AdminApi, FormTransport};
use crate::storage::SessionStore;
use crate::utils::time::{now, parse_portal_date};
use crate::utils::token::{generate_admin_id, generate_password};
use crate::utils::validation::phone_digits;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use validator::{Validate, ValidationError};

static CREATE_ADMIN_FORM: FormDescriptor = FormDescriptor {
    name: "create-admin",
    endpoint: Endpoint::api("/newadmin/signup"),
    encoding: Encoding::Multipart,
    fields: &[
        "AdminId",
        "PassKey",
        "name",
        "Email",
        "Course",
        "mobileNumber",
        "whatsappNumber",
        "StartDate",
        "ExpiryDate",
        "address",
        "HodName",
        "role",
        "navbarColor",
        "sidebarColor",
        "textColor",
    ],
    success_message: "Admin added successfully!",
    failure_message: "Something went wrong.",
    counter: None,
    reset_on_success: true,
};

pub const DEFAULT_ROLE: &str = "admin";

fn validate_color(raw: &str) -> std::result::Result<(), ValidationError> {
    let hex = raw.strip_prefix('#').unwrap_or_default();
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("color");
        err.message = Some(format!("{} is not a #RRGGBB color", raw).into());
        Err(err)
    }
}

fn validate_dates(form: &CreateAdminForm) -> std::result::Result<(), ValidationError> {
    let start = parse_portal_date(&form.start_date);
    let expiry = parse_portal_date(&form.expiry_date);
    match (start, expiry) {
        (Some(start), Some(expiry)) if start > expiry => {
            let mut err = ValidationError::new("dates");
            err.message = Some("Expiry Date must be after Start Date.".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_dates"))]
pub struct CreateAdminForm {
    #[validate(length(min = 1, message = "Admin ID is required"))]
    pub admin_id: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub pass_key: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email."))]
    pub email: String,
    #[validate(length(min = 1, message = "Course is required"))]
    pub course: String,
    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub mobile_number: String,
    #[validate(length(min = 1, message = "WhatsApp number is required"))]
    pub whatsapp_number: String,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "Expiry date is required"))]
    pub expiry_date: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "HOD name is required"))]
    pub hod_name: String,
    pub role: String,
    pub logo: Option<FilePayload>,
    #[validate(custom(function = "validate_color"))]
    pub navbar_color: String,
    #[validate(custom(function = "validate_color"))]
    pub sidebar_color: String,
    #[validate(custom(function = "validate_color"))]
    pub text_color: String,
}

impl CreateAdminForm {
    pub fn welcome_email(&self) -> EmailPayload {
        EmailPayload::welcome(
            &self.email,
            &self.admin_id,
            &self.pass_key,
            &self.start_date,
            &self.expiry_date,
        )
    }
}

impl FormModel for CreateAdminForm {
    fn descriptor() -> &'static FormDescriptor {
        &CREATE_ADMIN_FORM
    }

    /// Blank apart from a freshly generated admin id, the default role and
    /// the default theme.
    fn fresh() -> Self {
        Self {
            admin_id: generate_admin_id(now()),
            pass_key: String::new(),
            name: String::new(),
            email: String::new(),
            course: String::new(),
            mobile_number: String::new(),
            whatsapp_number: String::new(),
            start_date: String::new(),
            expiry_date: String::new(),
            address: String::new(),
            hod_name: String::new(),
            role: DEFAULT_ROLE.to_string(),
            logo: None,
            navbar_color: DEFAULT_NAVBAR_COLOR.to_string(),
            sidebar_color: DEFAULT_SIDEBAR_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "AdminId" => self.admin_id = value.to_string(),
            "PassKey" => self.pass_key = value.to_string(),
            "name" => self.name = value.to_string(),
            "Email" => self.email = value.trim().to_string(),
            "Course" => self.course = value.to_string(),
            "mobileNumber" => self.mobile_number = phone_digits(value),
            "whatsappNumber" => self.whatsapp_number = phone_digits(value),
            "StartDate" => self.start_date = value.to_string(),
            "ExpiryDate" => self.expiry_date = value.to_string(),
            "address" => self.address = value.to_string(),
            "HodName" => self.hod_name = value.to_string(),
            "role" => self.role = value.to_string(),
            "navbarColor" => self.navbar_color = value.to_string(),
            "sidebarColor" => self.sidebar_color = value.to_string(),
            "textColor" => self.text_color = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        let role = if self.role.trim().is_empty() {
            DEFAULT_ROLE
        } else {
            self.role.as_str()
        };
        let mut body = MultipartBody::default()
            .text("AdminId", &self.admin_id)
            .text("PassKey", &self.pass_key)
            .text("name", &self.name)
            .text("Course", &self.course)
            .text("Email", &self.email)
            .text("mobileNumber", &self.mobile_number)
            .text("whatsappNumber", &self.whatsapp_number)
            .text("StartDate", &self.start_date)
            .text("ExpiryDate", &self.expiry_date)
            .text("address", &self.address)
            .text("HodName", &self.hod_name)
            .text("role", role)
            .text("navbarColor", &self.navbar_color)
            .text("sidebarColor", &self.sidebar_color)
            .text("textColor", &self.text_color);
        if let Some(logo) = &self.logo {
            body = body.file("logo", logo.clone());
        }
        Ok(FormBody::Multipart(body))
    }
}

pub struct CreateAdminPage {
    form: FormPage<CreateAdminForm>,
    admins: Arc<dyn AdminApi>,
    notifier: Arc<dyn Notifier>,
}

impl CreateAdminPage {
    /// Only mounts with an admin session.
    pub fn mount(
        transport: Arc<dyn FormTransport>,
        admins: Arc<dyn AdminApi>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> std::result::Result<Self, Redirect> {
        require_session(&session, LOGIN_ROUTE)?;
        Ok(Self {
            form: FormPage::new(transport, notifier.clone(), session),
            admins,
            notifier,
        })
    }

    pub fn form(&self) -> &CreateAdminForm {
        self.form.model()
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.form.update_field(name, value)
    }

    pub fn regenerate_admin_id(&mut self) -> String {
        let id = generate_admin_id(now());
        self.form.model_mut().admin_id = id.clone();
        self.notifier.success("New Admin ID generated!");
        id
    }

    pub fn generate_password(&mut self) -> String {
        let password = generate_password();
        self.form.model_mut().pass_key = password.clone();
        self.notifier.success("New password generated!");
        password
    }

    /// Attaches a logo. Non-images and files over 5 MB are refused and the
    /// previous logo is kept.
    pub fn set_logo(&mut self, file: FilePayload) -> Result<()> {
        if file.len() > MAX_LOGO_BYTES {
            self.notifier.error("File size should be less than 5MB");
            return Err(Error::BadRequest(format!(
                "{} is {} bytes, limit is {}",
                file.file_name,
                file.len(),
                MAX_LOGO_BYTES
            )));
        }
        if let Err(e) = file.ensure_image() {
            self.notifier.error("Logo must be an image");
            return Err(e);
        }
        self.form.model_mut().logo = Some(file);
        Ok(())
    }

    pub fn clear_logo(&mut self) {
        self.form.model_mut().logo = None;
    }

    /// Creates the account, then mails the credentials. The form resets with
    /// a new admin id; an email failure does not undo the creation.
    pub async fn submit(&mut self) -> Result<JsonValue> {
        let created = self.form.model().clone();
        let response = self.form.submit().await?;
        tracing::info!(admin_id = %created.admin_id, "Admin created");

        match self.admins.send_email(&created.welcome_email()).await {
            Ok(()) => self.notifier.info("Welcome email has been sent."),
            Err(e) => {
                tracing::error!(error = %e, admin_id = %created.admin_id, "Error sending admin email");
                self.notifier
                    .error("Admin was created, but email sending failed.");
            }
        }
        Ok(response)
    }
}
