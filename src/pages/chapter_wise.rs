use crate::dto::ai_dto::{AssessRequest, AssessResponse};
use crate::dto::content_dto::{
    ChapterQuestionPayload, CreateContentGroupRequest, CreateContentGroupResponse,
    CreateQuestionResponse,
};
use crate::error::{Error, Result};
use crate::models::content_group::{parse_topic_tags, ContentGroup};
use crate::models::file::FilePayload;
use crate::models::question::{
    blank_options, mark_answer, render_mcq_text, set_correct, Difficulty, QuestionOption,
};
use crate::pages::form::{Encoding, FormDescriptor, FormModel, FormPage};
use crate::pages::upload::UploadSlot;
use crate::services::http::{Endpoint, FormBody};
use crate::services::notification_service::Notifier;
use crate::services::ports::{AssessmentApi, FormTransport, UploadApi};
use crate::storage::{ContentGroupDraft, Counter, SessionStore};
use std::sync::Arc;
use validator::Validate;

static CONTENT_GROUP_FORM: FormDescriptor = FormDescriptor {
    name: "content-group",
    endpoint: Endpoint::api("/pdfid"),
    encoding: Encoding::Json,
    fields: &["chapterName", "subject", "topicTags"],
    success_message: "PDF created",
    failure_message: "Error creating PDF",
    counter: None,
    reset_on_success: false,
};

pub(crate) static CHAPTER_QUESTION_FORM: FormDescriptor = FormDescriptor {
    name: "chapter-question",
    endpoint: Endpoint::api("/chatper-wise-question"),
    encoding: Encoding::Json,
    fields: &[
        "pdfId",
        "topicId",
        "question",
        "difficulty_level",
        "solution",
        "diagramPath",
        "topic",
    ],
    success_message: "Question created successfully",
    failure_message: "Error creating question",
    counter: Some(Counter::ChapterWise),
    reset_on_success: false,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct ContentGroupForm {
    #[validate(length(min = 1, message = "Chapter name is required"))]
    pub chapter_name: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    pub topic_tags: String,
}

impl ContentGroupForm {
    pub fn from_draft(draft: ContentGroupDraft) -> Self {
        Self {
            chapter_name: draft.chapter_name,
            subject: draft.subject,
            topic_tags: draft.topic_tags,
        }
    }

    pub fn draft(&self) -> ContentGroupDraft {
        ContentGroupDraft {
            chapter_name: self.chapter_name.clone(),
            subject: self.subject.clone(),
            topic_tags: self.topic_tags.clone(),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        parse_topic_tags(&self.topic_tags)
    }
}

impl FormModel for ContentGroupForm {
    fn descriptor() -> &'static FormDescriptor {
        &CONTENT_GROUP_FORM
    }

    fn fresh() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "chapterName" => self.chapter_name = value.to_string(),
            "subject" => self.subject = value.to_string(),
            "topicTags" => self.topic_tags = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        let request = CreateContentGroupRequest {
            chapter_name: self.chapter_name.trim().to_string(),
            subject: self.subject.trim().to_string(),
            topic_tags: self.tags(),
        };
        Ok(FormBody::Json(serde_json::to_value(request)?))
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ChapterQuestionForm {
    #[validate(length(min = 1, message = "PDF ID is required"))]
    pub pdf_id: String,
    pub topic_id: String,
    #[validate(length(min = 1, message = "Question text is required"))]
    pub question: String,
    pub difficulty_level: Difficulty,
    pub options: Vec<QuestionOption>,
    pub solution: String,
    pub diagram_path: String,
    pub topic: String,
}

impl Default for ChapterQuestionForm {
    fn default() -> Self {
        Self {
            pdf_id: String::new(),
            topic_id: String::new(),
            question: String::new(),
            difficulty_level: Difficulty::Medium,
            options: blank_options(),
            solution: String::new(),
            diagram_path: String::new(),
            topic: String::new(),
        }
    }
}

impl ChapterQuestionForm {
    pub fn mcq_text(&self) -> String {
        render_mcq_text(
            &self.question,
            self.options.iter().map(|o| o.option_text.as_str()),
        )
    }

    pub fn payload(&self) -> ChapterQuestionPayload {
        ChapterQuestionPayload {
            pdf_id: self.pdf_id.trim().to_string(),
            topic_id: self.topic_id.trim().to_string(),
            question: self.question.clone(),
            difficulty_level: self.difficulty_level,
            options: self.options.clone(),
            solution: self.solution.clone(),
            diagram_path: self.diagram_path.clone(),
            topic: self.topic.clone(),
        }
    }

    /// Copies an assessment into the form. Unknown difficulty words and
    /// answer letters leave the current values in place.
    pub fn apply_assessment(&mut self, assessment: &AssessResponse) {
        if let Some(level) = assessment
            .difficulty
            .as_deref()
            .and_then(Difficulty::from_assessment)
        {
            self.difficulty_level = level;
        }
        if let Some(explanation) = &assessment.explanation {
            self.solution = explanation.clone();
        }
        if let Some(answer) = assessment.answer.as_deref() {
            if mark_answer(&mut self.options, answer).is_none() {
                tracing::warn!(answer, "Assessment named an option that does not exist");
            }
        }
        if let Some(topic) = &assessment.topic {
            self.topic = topic.clone();
        }
    }
}

impl FormModel for ChapterQuestionForm {
    fn descriptor() -> &'static FormDescriptor {
        &CHAPTER_QUESTION_FORM
    }

    fn fresh() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "pdfId" => self.pdf_id = value.to_string(),
            "topicId" => self.topic_id = value.to_string(),
            "question" => self.question = value.to_string(),
            "difficulty_level" => {
                self.difficulty_level = value.parse().map_err(Error::BadRequest)?;
            }
            "solution" => self.solution = value.to_string(),
            "diagramPath" => self.diagram_path = value.to_string(),
            "topic" => self.topic = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        Ok(FormBody::Json(serde_json::to_value(self.payload())?))
    }
}

/// Chapter-wise question entry: create a content group, then write questions
/// against its id.
pub struct ChapterWisePage {
    group: FormPage<ContentGroupForm>,
    question: FormPage<ChapterQuestionForm>,
    diagram: UploadSlot,
    uploads: Arc<dyn UploadApi>,
    assessment: Arc<dyn AssessmentApi>,
    notifier: Arc<dyn Notifier>,
    session: SessionStore,
    content_group: Option<ContentGroup>,
}

impl ChapterWisePage {
    /// Restores the chapter/subject/topic drafts left in session storage.
    pub fn mount(
        transport: Arc<dyn FormTransport>,
        uploads: Arc<dyn UploadApi>,
        assessment: Arc<dyn AssessmentApi>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        let draft = ContentGroupForm::from_draft(session.content_group_draft());
        Self {
            group: FormPage::with_model(
                draft,
                transport.clone(),
                notifier.clone(),
                session.clone(),
            ),
            question: FormPage::new(transport, notifier.clone(), session.clone()),
            diagram: UploadSlot::new(),
            uploads,
            assessment,
            notifier,
            session,
            content_group: None,
        }
    }

    pub fn group_form(&self) -> &ContentGroupForm {
        self.group.model()
    }

    pub fn question_form(&self) -> &ChapterQuestionForm {
        self.question.model()
    }

    pub fn content_group(&self) -> Option<&ContentGroup> {
        self.content_group.as_ref()
    }

    pub fn diagram_path(&self) -> String {
        self.diagram.value()
    }

    pub fn diagram_slot(&self) -> UploadSlot {
        self.diagram.clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.diagram.is_uploading()
    }

    pub fn submitted_count(&self) -> u64 {
        self.session.submitted_count(Counter::ChapterWise)
    }

    /// Edits a content-group field and writes the draft through to storage.
    pub fn update_group_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.group.update_field(name, value)?;
        if let Err(e) = self
            .session
            .save_content_group_draft(&self.group.model().draft())
        {
            tracing::warn!(error = %e, "Could not persist content group draft");
        }
        Ok(())
    }

    pub fn update_question_field(&mut self, name: &str, value: &str) -> Result<()> {
        if name == "diagramPath" {
            self.diagram.set(value);
        }
        self.question.update_field(name, value)
    }

    pub fn set_option_text(&mut self, index: usize, text: &str) -> Result<()> {
        let option = self
            .question
            .model_mut()
            .options
            .get_mut(index)
            .ok_or_else(|| Error::BadRequest(format!("No option at index {}", index)))?;
        option.option_text = text.to_string();
        Ok(())
    }

    pub fn set_option_correct(&mut self, index: usize, is_correct: bool) -> Result<()> {
        let options = &mut self.question.model_mut().options;
        if index >= options.len() {
            return Err(Error::BadRequest(format!("No option at index {}", index)));
        }
        set_correct(options, index, is_correct);
        Ok(())
    }

    /// `POST /pdfid`; the returned id is copied into the question form.
    pub async fn create_content_group(&mut self) -> Result<String> {
        let created = self
            .group
            .submit_with(|response| {
                serde_json::from_value::<CreateContentGroupResponse>(response).map_err(|e| {
                    tracing::error!(error = %e, "Content group response had no pdfId");
                    Error::from(e)
                })
            })
            .await?;

        let form = self.group.model();
        self.content_group = Some(ContentGroup {
            id: Some(created.pdf_id.clone()),
            chapter_name: form.chapter_name.clone(),
            subject: form.subject.clone(),
            topic_tags: form.tags(),
        });
        self.question.model_mut().pdf_id = created.pdf_id.clone();
        tracing::info!(pdf_id = %created.pdf_id, "Content group created");
        Ok(created.pdf_id)
    }

    pub fn assess_request(&self) -> AssessRequest {
        let group = self.group.model();
        AssessRequest {
            mcq: self.question.model().mcq_text(),
            chapter: group.chapter_name.clone(),
            topics: group.tags(),
            subject: group.subject.clone(),
        }
    }

    pub async fn evaluate(&mut self) -> Result<AssessResponse> {
        let request = self.assess_request();
        let assessment = match self.assessment.assess(&request).await {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::error!(error = %e, "Difficulty evaluation failed");
                self.notifier.error("Failed to evaluate difficulty.");
                return Err(e);
            }
        };
        self.question.model_mut().apply_assessment(&assessment);
        self.notifier.success(&format!(
            "Difficulty evaluated as: {}",
            self.question.model().difficulty_level
        ));
        Ok(assessment)
    }

    /// Starts an upload; see [`UploadSlot`] for what happens with overlapping calls.
    pub async fn upload_diagram(&self, file: FilePayload) -> Result<String> {
        match self.diagram.upload(self.uploads.as_ref(), file).await {
            Ok(url) => Ok(url),
            Err(e) => {
                tracing::error!(error = %e, "Image upload failed");
                self.notifier.error("Failed to upload image");
                Err(e)
            }
        }
    }

    /// Sends the question with the current diagram url. Returns the new
    /// question's id when the backend reports one.
    pub async fn submit_question(&mut self) -> Result<Option<String>> {
        self.question.model_mut().diagram_path = self.diagram.value();
        self.question
            .submit_with(|response| Ok(CreateQuestionResponse::id_from(response)))
            .await
    }
}
