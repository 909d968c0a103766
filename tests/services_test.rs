use exam_portal_admin::config::Config;
use exam_portal_admin::dto::Envelope;
use exam_portal_admin::error::Error;
use exam_portal_admin::models::admin::AdminAccount;
use exam_portal_admin::services::admin_service::ADMIN_LIST_ENDPOINT;
use exam_portal_admin::services::ai_service::{ASSESS_ENDPOINT, EXTRACT_ENDPOINT};
use exam_portal_admin::services::content_service::UPLOAD_ENDPOINT;
use exam_portal_admin::services::http::{error_message, ApiClient, Endpoint, FormBody};
use exam_portal_admin::services::notification_service::RecordingNotifier;
use exam_portal_admin::storage::SessionStore;
use exam_portal_admin::Portal;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_test::assert_err;

/// Serves one canned HTTP response on a local port. The task yields the raw
/// request it received.
async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request_complete(&request) {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });
    (base, task)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..head_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= head_end + 4 + length
}

fn local_client(base: &str, session: SessionStore) -> ApiClient {
    let config = Config::new(base, base).unwrap();
    ApiClient::new(&config, Some(session)).unwrap()
}

#[test]
fn base_urls_are_checked_and_trimmed() {
    let config = Config::new("https://api.portal.test/", "http://localhost:5000//").unwrap();
    assert_eq!(config.api_base_url, "https://api.portal.test");
    assert_eq!(config.ai_service_url, "http://localhost:5000");
    assert!(config.request_timeout.is_none());

    assert_err!(Config::new("ftp://api.portal.test", "http://localhost:5000"));
    assert_err!(Config::new("not a url", "http://localhost:5000"));
}

#[test]
fn endpoints_resolve_against_their_own_backend() {
    let config = Config::new("https://api.portal.test/v1", "http://localhost:5000").unwrap();
    let client = ApiClient::new(&config, None).unwrap();

    assert_eq!(client.url(&UPLOAD_ENDPOINT), "https://api.portal.test/v1/upload");
    assert_eq!(
        client.url(&ADMIN_LIST_ENDPOINT),
        "https://api.portal.test/v1/superadmin/getadminlist"
    );
    assert_eq!(
        client.url(&EXTRACT_ENDPOINT),
        "http://localhost:5000/api/extract-mcqs"
    );
    assert_eq!(
        client.url(&ASSESS_ENDPOINT),
        "http://localhost:5000/api/assess-difficulty"
    );
    assert_eq!(
        client.url(&Endpoint::api_owned("/superadmin/updateAdmin/ADM1".to_string())),
        "https://api.portal.test/v1/superadmin/updateAdmin/ADM1"
    );
}

#[test]
fn error_bodies_yield_their_message_field() {
    assert_eq!(
        error_message(r#"{"message":"AdminId already exists"}"#).as_deref(),
        Some("AdminId already exists")
    );
    assert_eq!(
        error_message(r#"{"error":"Invalid token"}"#).as_deref(),
        Some("Invalid token")
    );
    assert_eq!(error_message(r#"{"status":500}"#), None);
    assert_eq!(error_message("<html>Bad Gateway</html>"), None);
}

#[test]
fn admin_records_come_wrapped_or_bare() {
    let wrapped: Envelope<AdminAccount> =
        serde_json::from_value(json!({ "data": { "AdminId": "ADM1", "name": "A" } })).unwrap();
    assert_eq!(wrapped.into_inner().unwrap().admin_id, "ADM1");

    let bare: Envelope<AdminAccount> =
        serde_json::from_value(json!({ "AdminId": "ADM2" })).unwrap();
    assert_eq!(bare.into_inner().unwrap().admin_id, "ADM2");

    let empty: Envelope<AdminAccount> = serde_json::from_value(json!({ "data": null })).unwrap();
    assert!(empty.into_inner().is_none());

    assert!(serde_json::from_value::<Envelope<AdminAccount>>(json!({ "message": "ok" })).is_err());
}

#[test]
fn portal_pages_share_one_session() {
    let config = Config::new("https://api.portal.test", "http://localhost:5000").unwrap();
    let session = SessionStore::in_memory();
    let portal =
        Portal::with_session(&config, session.clone(), Arc::new(RecordingNotifier::new())).unwrap();

    assert!(portal.admin_directory().is_err());
    session.set_auth_token("token").unwrap();
    assert!(portal.admin_directory().is_ok());
    assert!(portal.create_admin().is_ok());
    assert!(portal.admin_detail("ADM1").is_ok());
    assert!(portal.login().is_logged_in());
}

#[tokio::test]
async fn rejected_requests_carry_the_status_and_body_message() {
    let (base, server) =
        respond_once("422 Unprocessable Entity", r#"{"message":"AdminId already exists"}"#).await;
    let session = SessionStore::in_memory();
    session.set_auth_token("tok-1").unwrap();
    let client = local_client(&base, session);

    let result = client
        .send_form(
            &Endpoint::api("/newadmin/signup"),
            FormBody::Json(json!({ "AdminId": "ADM1" })),
        )
        .await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message.as_deref(), Some("AdminId already exists"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("post /newadmin/signup"));
    assert!(request.contains("authorization: bearer tok-1"));
    assert!(request.contains(r#"{"adminid":"adm1"}"#));
}

#[tokio::test]
async fn error_bodies_without_a_message_still_fail() {
    let (base, server) = respond_once("502 Bad Gateway", "<html>upstream</html>").await;
    let client = local_client(&base, SessionStore::in_memory());

    let result = client.get_json::<JsonValue>(&ADMIN_LIST_ENDPOINT).await;

    assert!(matches!(
        result,
        Err(Error::Api {
            status: 502,
            message: None
        })
    ));
    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /superadmin/getadminlist"));
    assert!(!request.contains("authorization:"));
}

#[tokio::test]
async fn empty_success_bodies_decode_as_null() {
    let (base, server) = respond_once("200 OK", "").await;
    let client = local_client(&base, SessionStore::in_memory());

    let value = client
        .send_form(&Endpoint::api("/pdfid"), FormBody::Json(json!({})))
        .await
        .unwrap();

    assert_eq!(value, JsonValue::Null);
    server.await.unwrap();
}
