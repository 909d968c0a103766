use crate::dto::admin_dto::LoginResponse;
use crate::error::{Error, Result};
use crate::pages::form::{Encoding, FormDescriptor, FormModel, FormPage};
use crate::services::http::{Endpoint, FormBody};
use crate::services::notification_service::Notifier;
use crate::services::ports::FormTransport;
use crate::storage::SessionStore;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use validator::Validate;

static LOGIN_FORM: FormDescriptor = FormDescriptor {
    name: "admin-login",
    endpoint: Endpoint::api("/superadmin/login"),
    encoding: Encoding::Json,
    fields: &["username", "passkey"],
    success_message: "Login successful",
    failure_message: "Invalid credentials",
    counter: None,
    reset_on_success: false,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Pass key is required"))]
    pub passkey: String,
}

impl FormModel for LoginForm {
    fn descriptor() -> &'static FormDescriptor {
        &LOGIN_FORM
    }

    fn fresh() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "username" => self.username = value.trim().to_string(),
            "passkey" => self.passkey = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        Ok(FormBody::Json(serde_json::to_value(self)?))
    }
}

fn read_token(response: JsonValue) -> Result<String> {
    let LoginResponse { token } = serde_json::from_value(response).map_err(|e| {
        tracing::error!(error = %e, "Login response carried no token");
        Error::Unauthorized("Login failed: no session token received".to_string())
    })?;
    if token.trim().is_empty() {
        return Err(Error::Unauthorized(
            "Login failed: no session token received".to_string(),
        ));
    }
    Ok(token)
}

pub struct LoginPage {
    form: FormPage<LoginForm>,
    session: SessionStore,
}

impl LoginPage {
    pub fn mount(
        transport: Arc<dyn FormTransport>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        Self {
            form: FormPage::new(transport, notifier, session.clone()),
            session,
        }
    }

    pub fn form(&self) -> &LoginForm {
        self.form.model()
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.form.update_field(name, value)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.auth_token().is_some()
    }

    /// Exchanges the credentials for a token and keeps it in session storage.
    /// A reply without a usable token counts as a failed login.
    pub async fn login(&mut self) -> Result<String> {
        let token = self.form.submit_with(read_token).await?;
        self.session.set_auth_token(&token)?;
        self.form.model_mut().passkey.clear();
        tracing::info!(username = %self.form.model().username, "Admin session started");
        Ok(token)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear_auth_token()?;
        tracing::info!("Admin session cleared");
        Ok(())
    }
}
