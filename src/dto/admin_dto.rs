use crate::models::admin::AdminAccount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListResponse {
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAdminPayload {
    #[serde(rename = "AdminId")]
    pub admin_id: String,
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: String,
    #[serde(rename = "whatsappNumber")]
    pub whatsapp_number: String,
    pub address: String,
    pub role: String,
    #[serde(rename = "Course")]
    pub course: String,
    #[serde(rename = "HodName")]
    pub hod_name: String,
    #[serde(rename = "StartDate")]
    pub start_date: Option<String>,
    #[serde(rename = "ExpiryDate")]
    pub expiry_date: Option<String>,
}

impl From<UpdateAdminPayload> for AdminAccount {
    fn from(p: UpdateAdminPayload) -> Self {
        let some = |s: String| Some(s).filter(|v| !v.is_empty());
        AdminAccount {
            admin_id: p.admin_id,
            name: some(p.name),
            email: some(p.email),
            mobile_number: some(p.mobile_number),
            whatsapp_number: some(p.whatsapp_number),
            address: some(p.address),
            role: some(p.role),
            course: some(p.course),
            hod_name: some(p.hod_name),
            start_date: p.start_date,
            expiry_date: p.expiry_date,
            ..AdminAccount::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl EmailPayload {
    pub fn welcome(
        to: &str,
        admin_id: &str,
        password: &str,
        start_date: &str,
        expiry_date: &str,
    ) -> Self {
        let text = format!(
            "Hello,\n\nYou have been added as an admin of the Exam Portal.\n\n\
             Your login credentials:\n\n\
             Admin ID: {}\nPassword: {}\nStart Date: {}\nExpiry Date: {}\n\n\
             Please keep this information safe.\n\n\
             Best wishes,\nThe Exam Portal Team",
            admin_id, password, start_date, expiry_date
        );
        Self {
            to: to.to_string(),
            subject: "Welcome aboard as Admin at Exam Portal".to_string(),
            text,
        }
    }
}
