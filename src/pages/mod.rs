//! One page object per portal screen.
//!
//! Pages own their form state, talk to the backend through the traits in
//! [`crate::services::ports`], and report outcomes through a
//! [`Notifier`](crate::services::notification_service::Notifier).

pub mod admin_create;
pub mod admin_detail;
pub mod admin_directory;
pub mod chapter_wise;
pub mod extractor;
pub mod form;
pub mod login;
pub mod previous_year;
pub mod upload;

use crate::storage::SessionStore;

pub const LOGIN_ROUTE: &str = "/";
pub const ADMIN_LOGIN_ROUTE: &str = "/admin-login";

/// Where a guarded page sends the user instead of mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
}

/// Pages that manage admins only mount with a stored session token.
pub fn require_session(session: &SessionStore, login_route: &'static str) -> Result<String, Redirect> {
    session.auth_token().ok_or_else(|| {
        tracing::info!(to = login_route, "No admin session, redirecting");
        Redirect { to: login_route }
    })
}

/// The blocking yes/no dialog in front of destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
