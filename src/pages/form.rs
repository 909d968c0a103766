use crate::error::{Error, Result};
use crate::services::http::{Endpoint, FormBody};
use crate::services::notification_service::Notifier;
use crate::services::ports::FormTransport;
use crate::storage::{Counter, SessionStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

impl Encoding {
    pub fn of(body: &FormBody) -> Self {
        match body {
            FormBody::Json(_) => Encoding::Json,
            FormBody::Multipart(_) => Encoding::Multipart,
        }
    }
}

/// Everything that distinguishes one entry form from another.
#[derive(Debug)]
pub struct FormDescriptor {
    pub name: &'static str,
    pub endpoint: Endpoint,
    /// The body variant [`FormModel::body`] must produce.
    pub encoding: Encoding,
    /// Input names `update_field` accepts. Required-ness lives on the
    /// model's validator derives.
    pub fields: &'static [&'static str],
    pub success_message: &'static str,
    pub failure_message: &'static str,
    /// Bumped in session storage after each successful submit.
    pub counter: Option<Counter>,
    pub reset_on_success: bool,
}

impl FormDescriptor {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }
}

/// A typed form record that a [`FormPage`] can edit and submit.
pub trait FormModel: Validate + Clone + Send + Sync {
    fn descriptor() -> &'static FormDescriptor;

    /// A blank form, used at mount and after a resetting submit.
    fn fresh() -> Self;

    /// Applies one text input. Only called with names the descriptor lists.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;

    fn body(&self) -> Result<FormBody>;
}

pub struct FormPage<M: FormModel> {
    model: M,
    transport: Arc<dyn FormTransport>,
    notifier: Arc<dyn Notifier>,
    session: SessionStore,
}

impl<M: FormModel> FormPage<M> {
    pub fn new(
        transport: Arc<dyn FormTransport>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        Self::with_model(M::fresh(), transport, notifier, session)
    }

    pub fn with_model(
        model: M,
        transport: Arc<dyn FormTransport>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        Self {
            model,
            transport,
            notifier,
            session,
        }
    }

    pub fn descriptor(&self) -> &'static FormDescriptor {
        M::descriptor()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn reset(&mut self) {
        self.model = M::fresh();
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<()> {
        let descriptor = M::descriptor();
        if !descriptor.has_field(name) {
            return Err(Error::BadRequest(format!(
                "{} has no field named {}",
                descriptor.name, name
            )));
        }
        self.model.set_field(name, value)
    }

    pub fn submitted_count(&self) -> Option<u64> {
        M::descriptor()
            .counter
            .map(|counter| self.session.submitted_count(counter))
    }

    /// Validates and sends the form. On failure the form is left exactly as it
    /// was so the user can fix it or resend; nothing is retried.
    pub async fn submit(&mut self) -> Result<JsonValue> {
        self.submit_with(Ok).await
    }

    /// Like [`submit`](Self::submit), but the response must also pass
    /// `decode`. The success notice, counter and reset only happen once it
    /// does; a decode failure is reported like a send failure.
    pub async fn submit_with<T>(
        &mut self,
        decode: impl FnOnce(JsonValue) -> Result<T>,
    ) -> Result<T> {
        let descriptor = M::descriptor();

        let body = match self.model.validate() {
            Ok(()) => self.model.body(),
            Err(e) => Err(e.into()),
        };
        let body = match body {
            Ok(body) if Encoding::of(&body) == descriptor.encoding => body,
            Ok(body) => {
                return Err(self.fail(Error::Internal(format!(
                    "{} built a {:?} body, expected {:?}",
                    descriptor.name,
                    Encoding::of(&body),
                    descriptor.encoding
                ))))
            }
            Err(e) => return Err(self.fail(e)),
        };

        let response = match self.transport.send(&descriptor.endpoint, body).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e)),
        };
        let decoded = match decode(response) {
            Ok(decoded) => decoded,
            Err(e) => return Err(self.fail(e)),
        };

        tracing::info!(form = descriptor.name, "Form submitted");
        if let Some(counter) = descriptor.counter {
            match self.session.record_submission(counter) {
                Ok(count) => tracing::debug!(form = descriptor.name, count, "Submission counted"),
                Err(e) => tracing::warn!(form = descriptor.name, error = %e, "Could not persist counter"),
            }
        }
        self.notifier.success(descriptor.success_message);
        if descriptor.reset_on_success {
            self.reset();
        }
        Ok(decoded)
    }

    fn fail(&self, err: Error) -> Error {
        let descriptor = M::descriptor();
        tracing::error!(form = descriptor.name, error = %err, "Form submission failed");
        self.notifier
            .error(&err.user_message(descriptor.failure_message));
        err
    }
}
