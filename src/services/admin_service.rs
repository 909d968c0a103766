use crate::dto::admin_dto::{AdminListResponse, EmailPayload, UpdateAdminPayload};
use crate::dto::Envelope;
use crate::error::Result;
use crate::models::admin::AdminAccount;
use crate::services::http::{ApiClient, Endpoint};
use crate::services::ports::AdminApi;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

pub const ADMIN_LIST_ENDPOINT: Endpoint = Endpoint::api("/superadmin/getadminlist");
pub const EMAIL_ENDPOINT: Endpoint = Endpoint::api("/email");

#[derive(Clone)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn encode_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[async_trait]
impl AdminApi for AdminService {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>> {
        let response: AdminListResponse = self.client.get_json(&ADMIN_LIST_ENDPOINT).await?;
        tracing::info!("Loaded {} admins", response.admins.len());
        Ok(response.admins)
    }

    async fn get_admin(&self, admin_id: &str) -> Result<Option<AdminAccount>> {
        let endpoint =
            Endpoint::api_owned(format!("/superadmin/getadmin/{}", encode_segment(admin_id)));
        let response: Option<Envelope<AdminAccount>> = self.client.get_json(&endpoint).await?;
        Ok(response.and_then(Envelope::into_inner))
    }

    async fn update_admin(
        &self,
        admin_id: &str,
        payload: &UpdateAdminPayload,
    ) -> Result<Option<AdminAccount>> {
        let endpoint =
            Endpoint::api_owned(format!("/superadmin/updateAdmin/{}", encode_segment(admin_id)));
        let response: JsonValue = self.client.put_json(&endpoint, payload).await?;
        tracing::info!(admin_id, "Admin updated");
        // The updated record is optional in the response; callers fall back to the payload.
        Ok(serde_json::from_value::<Envelope<AdminAccount>>(response)
            .ok()
            .and_then(Envelope::into_inner))
    }

    async fn send_email(&self, email: &EmailPayload) -> Result<()> {
        let _: JsonValue = self.client.post_json(&EMAIL_ENDPOINT, email).await?;
        tracing::info!(to = %email.to, "Admin email sent");
        Ok(())
    }
}
