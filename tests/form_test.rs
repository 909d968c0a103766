mod common;

use common::MockTransport;
use exam_portal_admin::error::{Error, Result};
use exam_portal_admin::pages::form::{Encoding, FormDescriptor, FormModel, FormPage};
use exam_portal_admin::services::http::{Endpoint, FormBody, MultipartBody};
use exam_portal_admin::services::notification_service::{NoticeLevel, RecordingNotifier};
use exam_portal_admin::storage::{Counter, SessionStore};
use serde_json::json;
use std::sync::Arc;
use tokio_test::assert_err;
use validator::Validate;

static NOTE_FORM: FormDescriptor = FormDescriptor {
    name: "note",
    endpoint: Endpoint::api("/notes"),
    encoding: Encoding::Json,
    fields: &["text"],
    success_message: "Note saved",
    failure_message: "Could not save note",
    counter: Some(Counter::ChapterWise),
    reset_on_success: true,
};

#[derive(Debug, Clone, Default, PartialEq, Validate)]
struct NoteForm {
    #[validate(length(min = 1))]
    text: String,
    as_multipart: bool,
}

impl FormModel for NoteForm {
    fn descriptor() -> &'static FormDescriptor {
        &NOTE_FORM
    }

    fn fresh() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "text" => self.text = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        if self.as_multipart {
            Ok(FormBody::Multipart(MultipartBody::default().text("text", &self.text)))
        } else {
            Ok(FormBody::Json(json!({ "text": self.text })))
        }
    }
}

fn note_page(transport: MockTransport) -> (FormPage<NoteForm>, Arc<RecordingNotifier>, SessionStore) {
    let notifier = Arc::new(RecordingNotifier::new());
    let session = SessionStore::in_memory();
    let page = FormPage::new(Arc::new(transport), notifier.clone(), session.clone());
    (page, notifier, session)
}

#[tokio::test]
async fn body_of_the_wrong_encoding_is_never_sent() {
    let mut transport = MockTransport::new();
    transport.expect_send().never();
    let (mut page, notifier, session) = note_page(transport);
    page.update_field("text", "hello").unwrap();
    page.model_mut().as_multipart = true;

    assert!(matches!(page.submit().await, Err(Error::Internal(_))));

    assert_eq!(notifier.errors(), ["Could not save note"]);
    assert_eq!(page.model().text, "hello");
    assert_eq!(session.submitted_count(Counter::ChapterWise), 0);
}

#[tokio::test]
async fn undecodable_response_is_a_failure_without_success_side_effects() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .times(1)
        .returning(|_, _| Ok(json!({ "unexpected": true })));
    let (mut page, notifier, session) = note_page(transport);
    page.update_field("text", "hello").unwrap();

    let result = page
        .submit_with(|response| {
            response["id"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::Internal("no id".into()))
        })
        .await;

    assert_err!(result);
    assert_eq!(notifier.errors(), ["Could not save note"]);
    assert!(notifier.notices().iter().all(|n| n.level != NoticeLevel::Success));
    assert_eq!(page.model().text, "hello");
    assert_eq!(session.submitted_count(Counter::ChapterWise), 0);
}

#[tokio::test]
async fn decoded_response_counts_notifies_and_resets() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|endpoint, body| {
            endpoint.path == "/notes" && *body == FormBody::Json(json!({ "text": "hello" }))
        })
        .times(1)
        .returning(|_, _| Ok(json!({ "id": "n-1" })));
    let (mut page, notifier, session) = note_page(transport);
    page.update_field("text", "hello").unwrap();

    let id = page
        .submit_with(|response| {
            response["id"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::Internal("no id".into()))
        })
        .await
        .unwrap();

    assert_eq!(id, "n-1");
    assert_eq!(notifier.last().unwrap().message, "Note saved");
    assert_eq!(session.submitted_count(Counter::ChapterWise), 1);
    assert_eq!(page.model(), &NoteForm::default());
}
