use crate::dto::ai_dto::{AssessRequest, AssessResponse};
use crate::dto::content_dto::{LetteredOptions, PreviousYearPayload};
use crate::error::{Error, Result};
use crate::models::file::FilePayload;
use crate::models::question::{answer_index, render_mcq_text, Subject, OPTION_COUNT};
use crate::pages::form::{Encoding, FormDescriptor, FormModel, FormPage};
use crate::pages::upload::UploadSlot;
use crate::services::http::{Endpoint, FormBody};
use crate::services::notification_service::Notifier;
use crate::services::ports::{AssessmentApi, FormTransport, UploadApi};
use crate::storage::{Counter, SessionStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use validator::{Validate, ValidationError};

static PREVIOUS_YEAR_FORM: FormDescriptor = FormDescriptor {
    name: "previous-year-question",
    endpoint: Endpoint::api("/create-questions"),
    encoding: Encoding::Json,
    fields: &["year", "subject", "question", "correctAnswer", "solution", "diagramUrl"],
    success_message: "Question saved successfully.",
    failure_message: "Failed to save question.",
    counter: Some(Counter::PreviousYear),
    reset_on_success: false,
};

fn validate_year(year: &str) -> std::result::Result<(), ValidationError> {
    match year.trim().parse::<i32>() {
        Ok(y) if (1900..=2100).contains(&y) => Ok(()),
        _ => {
            let mut err = ValidationError::new("year");
            err.message = Some("Year must be a four-digit number".into());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct PreviousYearForm {
    #[validate(custom(function = "validate_year"))]
    pub year: String,
    pub subject: Subject,
    #[validate(length(min = 1, message = "Question text is required"))]
    pub question: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub solution: String,
    pub diagram_url: String,
}

impl Default for PreviousYearForm {
    fn default() -> Self {
        Self {
            year: String::new(),
            subject: Subject::Physics,
            question: String::new(),
            correct_answer: String::new(),
            options: vec![String::new(); OPTION_COUNT],
            solution: String::new(),
            diagram_url: String::new(),
        }
    }
}

impl PreviousYearForm {
    pub fn payload(&self) -> Result<PreviousYearPayload> {
        let year = self
            .year
            .trim()
            .parse()
            .map_err(|_| Error::BadRequest(format!("Invalid year: {}", self.year)))?;
        Ok(PreviousYearPayload {
            year,
            subject: self.subject.to_string(),
            question: self.question.clone(),
            correct_answer: self.correct_answer.clone(),
            options: LetteredOptions::from_slice(&self.options),
            solution: self.solution.clone(),
            diagram_url: self.diagram_url.clone(),
        })
    }

    pub fn mcq_text(&self) -> String {
        render_mcq_text(&self.question, self.options.iter().map(String::as_str))
    }
}

impl FormModel for PreviousYearForm {
    fn descriptor() -> &'static FormDescriptor {
        &PREVIOUS_YEAR_FORM
    }

    fn fresh() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "year" => self.year = value.to_string(),
            "subject" => self.subject = value.parse().map_err(Error::BadRequest)?,
            "question" => self.question = value.to_string(),
            "correctAnswer" => self.correct_answer = value.to_string(),
            "solution" => self.solution = value.to_string(),
            "diagramUrl" => self.diagram_url = value.to_string(),
            _ => return Err(Error::BadRequest(format!("Unknown field {}", name))),
        }
        Ok(())
    }

    fn body(&self) -> Result<FormBody> {
        Ok(FormBody::Json(serde_json::to_value(self.payload()?)?))
    }
}

/// Previous-year question entry. The correct answer is stored as the full
/// option text rather than a letter.
pub struct PreviousYearPage {
    form: FormPage<PreviousYearForm>,
    diagram: UploadSlot,
    uploads: Arc<dyn UploadApi>,
    assessment: Arc<dyn AssessmentApi>,
    notifier: Arc<dyn Notifier>,
}

impl PreviousYearPage {
    pub fn mount(
        transport: Arc<dyn FormTransport>,
        uploads: Arc<dyn UploadApi>,
        assessment: Arc<dyn AssessmentApi>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        Self {
            form: FormPage::new(transport, notifier.clone(), session),
            diagram: UploadSlot::new(),
            uploads,
            assessment,
            notifier,
        }
    }

    pub fn form(&self) -> &PreviousYearForm {
        self.form.model()
    }

    pub fn submitted_count(&self) -> u64 {
        self.form.submitted_count().unwrap_or_default()
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<()> {
        if name == "diagramUrl" {
            self.diagram.set(value);
        }
        self.form.update_field(name, value)
    }

    pub fn set_option(&mut self, index: usize, text: &str) -> Result<()> {
        let option = self
            .form
            .model_mut()
            .options
            .get_mut(index)
            .ok_or_else(|| Error::BadRequest(format!("No option at index {}", index)))?;
        *option = text.to_string();
        Ok(())
    }

    pub fn diagram_url(&self) -> String {
        self.diagram.value()
    }

    pub fn diagram_slot(&self) -> UploadSlot {
        self.diagram.clone()
    }

    pub async fn upload_diagram(&self, file: FilePayload) -> Result<String> {
        self.diagram
            .upload(self.uploads.as_ref(), file)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Image upload failed");
                self.notifier.error("Failed to upload image");
                e
            })
    }

    pub fn remove_diagram(&mut self) {
        self.diagram.clear();
        self.form.model_mut().diagram_url.clear();
    }

    /// Asks the assessment service for the right option and stores its full text.
    pub async fn evaluate(&mut self) -> Result<AssessResponse> {
        let form = self.form.model();
        let request = AssessRequest {
            mcq: form.mcq_text(),
            subject: form.subject.to_string(),
            ..AssessRequest::default()
        };

        let assessment = match self.assessment.assess(&request).await {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::error!(error = %e, "Answer evaluation failed");
                self.notifier.error("Failed to evaluate correct answer.");
                return Err(e);
            }
        };

        let form = self.form.model_mut();
        let chosen = assessment
            .answer
            .as_deref()
            .and_then(answer_index)
            .and_then(|i| form.options.get(i))
            .filter(|text| !text.is_empty())
            .cloned();
        let Some(answer_text) = chosen else {
            tracing::warn!(answer = ?assessment.answer, "Assessment answer does not match an option");
            self.notifier.error("Invalid answer received from AI.");
            return Err(Error::BadRequest("Invalid answer received from AI.".to_string()));
        };

        form.correct_answer = answer_text;
        if let Some(explanation) = &assessment.explanation {
            form.solution = explanation.clone();
        }
        Ok(assessment)
    }

    pub async fn submit(&mut self) -> Result<JsonValue> {
        self.form.model_mut().diagram_url = self.diagram.value();
        self.form.submit().await
    }
}
