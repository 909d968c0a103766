use crate::utils::time::parse_portal_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_NAVBAR_COLOR: &str = "#3B82F6";
pub const DEFAULT_SIDEBAR_COLOR: &str = "#1E40AF";
pub const DEFAULT_TEXT_COLOR: &str = "#1F2937";

/// An admin record as the backend returns it. Every field except the
/// identifier is optional because older records lack most of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdminAccount {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "AdminId")]
    pub admin_id: String,
    #[serde(rename = "PassKey", default, skip_serializing_if = "Option::is_none")]
    pub pass_key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Course", default)]
    pub course: Option<String>,
    #[serde(rename = "mobileNumber", default)]
    pub mobile_number: Option<String>,
    #[serde(rename = "whatsappNumber", default)]
    pub whatsapp_number: Option<String>,
    #[serde(rename = "StartDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "ExpiryDate", default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "HodName", default)]
    pub hod_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "navbarColor", default)]
    pub navbar_color: Option<String>,
    #[serde(rename = "sidebarColor", default)]
    pub sidebar_color: Option<String>,
    #[serde(rename = "textColor", default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub created_by_admin_id: Option<i64>,
}

impl AdminAccount {
    pub fn expiry(&self) -> Option<&str> {
        self.expiry_date.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> AdminStatus {
        AdminStatus::compute(self.expiry(), now)
    }

    pub fn is_root(&self) -> bool {
        self.created_by_admin_id.is_none()
    }

    /// Whole days until expiry, rounded up. Negative once expired.
    pub fn days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        let expiry = parse_portal_date(self.expiry()?)?;
        let millis = (expiry - now).num_milliseconds();
        let day = 24 * 60 * 60 * 1000;
        Some(millis.div_euclid(day) + i64::from(millis.rem_euclid(day) != 0))
    }

    /// Overlays the non-empty fields of `other` onto this record.
    pub fn merge(&mut self, other: AdminAccount) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        if !other.admin_id.is_empty() {
            self.admin_id = other.admin_id;
        }
        take!(
            id,
            name,
            email,
            course,
            mobile_number,
            whatsapp_number,
            start_date,
            expiry_date,
            address,
            hod_name,
            role,
            navbar_color,
            sidebar_color,
            text_color,
            created_by_admin_id
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminStatus {
    Active,
    Expired,
    NoExpiry,
}

impl AdminStatus {
    /// Active iff the expiry lies strictly after `now`. A set but unreadable
    /// expiry counts as expired.
    pub fn compute(expiry: Option<&str>, now: DateTime<Utc>) -> Self {
        match expiry {
            None => AdminStatus::NoExpiry,
            Some(raw) => match parse_portal_date(raw) {
                Some(at) if at > now => AdminStatus::Active,
                _ => AdminStatus::Expired,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminStatus::Active => "Active",
            AdminStatus::Expired => "Expired",
            AdminStatus::NoExpiry => "No Expiry",
        }
    }
}

impl fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
