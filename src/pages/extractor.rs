use crate::dto::ai_dto::AssessRequest;
use crate::dto::content_dto::CreateQuestionResponse;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::file::{ClipboardItem, FilePayload};
use crate::models::question::{mark_answer, render_mcq_text, set_correct, Difficulty};
use crate::pages::chapter_wise::ChapterQuestionForm;
use crate::pages::form::FormModel;
use crate::services::notification_service::Notifier;
use crate::services::ports::{AssessmentApi, ExtractionApi, FormTransport};
use crate::storage::{Counter, SessionStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct ExtractorState {
    image: Option<FilePayload>,
    candidates: Vec<Candidate>,
    pdf_id: String,
    extract_error: Option<String>,
}

/// Image-to-questions review page.
///
/// Methods take `&self`: each candidate can be evaluated or submitted while
/// others are in flight, and a candidate's own status refuses a second
/// request until the first one settles.
pub struct ExtractorPage {
    state: Mutex<ExtractorState>,
    extracting: AtomicBool,
    extraction: Arc<dyn ExtractionApi>,
    assessment: Arc<dyn AssessmentApi>,
    transport: Arc<dyn FormTransport>,
    notifier: Arc<dyn Notifier>,
    session: SessionStore,
}

impl ExtractorPage {
    pub fn mount(
        extraction: Arc<dyn ExtractionApi>,
        assessment: Arc<dyn AssessmentApi>,
        transport: Arc<dyn FormTransport>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        Self {
            state: Mutex::new(ExtractorState::default()),
            extracting: AtomicBool::new(false),
            extraction,
            assessment,
            transport,
            notifier,
            session,
        }
    }

    fn state(&self) -> MutexGuard<'_, ExtractorState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_image(&self, image: FilePayload) -> Result<()> {
        image.ensure_image()?;
        let mut state = self.state();
        state.image = Some(image);
        state.extract_error = None;
        Ok(())
    }

    /// Takes the first image out of a paste; returns false when there was none.
    pub fn paste_image(&self, items: Vec<ClipboardItem>) -> bool {
        match FilePayload::from_clipboard(items) {
            Some(image) => self.set_image(image).is_ok(),
            None => false,
        }
    }

    pub fn has_image(&self) -> bool {
        self.state().image.is_some()
    }

    pub fn is_extracting(&self) -> bool {
        self.extracting.load(Ordering::SeqCst)
    }

    pub fn extract_error(&self) -> Option<String> {
        self.state().extract_error.clone()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.state().candidates.clone()
    }

    pub fn candidate(&self, index: usize) -> Option<Candidate> {
        self.state().candidates.get(index).cloned()
    }

    pub fn pdf_id(&self) -> String {
        self.state().pdf_id.clone()
    }

    pub fn set_pdf_id(&self, pdf_id: &str) {
        self.state().pdf_id = pdf_id.to_string();
    }

    pub fn submitted_count(&self) -> u64 {
        self.session.submitted_count(Counter::Extracted)
    }

    /// Replaces the candidate list with whatever the extraction service reads
    /// from the current image.
    pub async fn extract(&self) -> Result<usize> {
        let Some(image) = self.state().image.clone() else {
            self.notifier.error("Please upload an image first.");
            return Err(Error::BadRequest("Please upload an image first.".to_string()));
        };
        if self.extracting.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy("Extraction already running".to_string()));
        }
        {
            let mut state = self.state();
            state.extract_error = None;
            state.candidates.clear();
        }

        let result = self.extraction.extract_mcqs(image).await;
        self.extracting.store(false, Ordering::SeqCst);

        match result {
            Ok(mcqs) => {
                let candidates: Vec<Candidate> =
                    mcqs.into_iter().map(Candidate::from_extracted).collect();
                tracing::info!("Extracted {} candidate questions", candidates.len());
                let count = candidates.len();
                self.state().candidates = candidates;
                Ok(count)
            }
            Err(e) => {
                let message = format!(
                    "Failed to extract MCQs: {}",
                    e.user_message(&e.to_string())
                );
                tracing::error!(error = %e, "Extraction failed");
                self.state().extract_error = Some(message);
                Err(e)
            }
        }
    }

    fn with_candidate<T>(
        &self,
        index: usize,
        f: impl FnOnce(&mut Candidate) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state();
        let candidate = state
            .candidates
            .get_mut(index)
            .ok_or_else(|| Error::BadRequest(format!("No question at index {}", index)))?;
        f(candidate)
    }

    // Candidates are looked up by id after an await: a new extraction may
    // have replaced the list meanwhile.
    fn with_candidate_id(&self, id: Uuid, f: impl FnOnce(&mut Candidate)) {
        let mut state = self.state();
        match state.candidates.iter_mut().find(|c| c.id == id) {
            Some(candidate) => f(candidate),
            None => tracing::debug!(%id, "Candidate gone before its request settled"),
        }
    }

    pub fn update_question(&self, index: usize, text: &str) -> Result<()> {
        self.with_candidate(index, |c| {
            c.question = text.to_string();
            Ok(())
        })
    }

    pub fn update_solution(&self, index: usize, text: &str) -> Result<()> {
        self.with_candidate(index, |c| {
            c.solution = text.to_string();
            Ok(())
        })
    }

    pub fn set_difficulty(&self, index: usize, level: Difficulty) -> Result<()> {
        self.with_candidate(index, |c| {
            c.difficulty_level = level;
            Ok(())
        })
    }

    pub fn set_option_text(&self, index: usize, option: usize, text: &str) -> Result<()> {
        self.with_candidate(index, |c| {
            let opt = c
                .options
                .get_mut(option)
                .ok_or_else(|| Error::BadRequest(format!("No option at index {}", option)))?;
            opt.option_text = text.to_string();
            Ok(())
        })
    }

    pub fn set_option_correct(&self, index: usize, option: usize, is_correct: bool) -> Result<()> {
        self.with_candidate(index, |c| {
            if option >= c.options.len() {
                return Err(Error::BadRequest(format!("No option at index {}", option)));
            }
            set_correct(&mut c.options, option, is_correct);
            Ok(())
        })
    }

    pub async fn evaluate(&self, index: usize) -> Result<()> {
        let (id, evaluated, request) = self.with_candidate(index, |c| {
            if !c.status.can_evaluate() {
                return Err(Error::Busy(format!("Question {} is {}", index + 1, c.status.label())));
            }
            let evaluated = c.status.is_evaluated();
            c.status = CandidateStatus::Evaluating { evaluated };
            let request = AssessRequest {
                mcq: render_mcq_text(&c.question, c.options.iter().map(|o| o.option_text.as_str())),
                ..AssessRequest::default()
            };
            Ok((c.id, evaluated, request))
        })?;

        match self.assessment.assess(&request).await {
            Ok(assessment) => {
                self.with_candidate_id(id, |c| {
                    if let Some(level) = assessment
                        .difficulty
                        .as_deref()
                        .and_then(Difficulty::from_assessment)
                    {
                        c.difficulty_level = level;
                    }
                    if let Some(explanation) = &assessment.explanation {
                        c.solution = explanation.clone();
                    }
                    c.topic = assessment.topic.clone().unwrap_or_default();
                    if let Some(answer) = assessment.answer.as_deref() {
                        if mark_answer(&mut c.options, answer).is_none() {
                            tracing::warn!(answer, "Assessment named an option that does not exist");
                        }
                    }
                    c.status = CandidateStatus::Evaluated;
                });
                if let Some(topic_id) = &assessment.topic_id {
                    self.set_pdf_id(topic_id);
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, question = index + 1, "Difficulty evaluation failed");
                self.with_candidate_id(id, |c| {
                    c.status = CandidateStatus::Failed {
                        reason: e.to_string(),
                        evaluated,
                    };
                });
                self.notifier.error("Failed to evaluate difficulty.");
                Err(e)
            }
        }
    }

    /// Submits one candidate to the chapter-wise question endpoint using the
    /// page's pdf id. A submitted candidate cannot be sent again.
    pub async fn submit(&self, index: usize) -> Result<()> {
        let pdf_id = self.pdf_id();
        let (id, evaluated, form) = self.with_candidate(index, |c| {
            if !c.status.can_submit() {
                return Err(Error::Busy(format!("Question {} is {}", index + 1, c.status.label())));
            }
            let form = ChapterQuestionForm {
                pdf_id: pdf_id.clone(),
                question: c.question.clone(),
                difficulty_level: c.difficulty_level,
                options: c.options.clone(),
                solution: c.solution.clone(),
                diagram_path: c.diagram_path.clone(),
                topic: c.topic.clone(),
                ..ChapterQuestionForm::default()
            };
            let evaluated = c.status.is_evaluated();
            c.status = CandidateStatus::Submitting { evaluated };
            Ok((c.id, evaluated, form))
        })?;

        let result = match validator::Validate::validate(&form) {
            Ok(()) => match form.body() {
                Ok(body) => {
                    self.transport
                        .send(&ChapterQuestionForm::descriptor().endpoint, body)
                        .await
                }
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(response) => {
                self.with_candidate_id(id, |c| c.status = CandidateStatus::Submitted);
                if let Err(e) = self.session.record_submission(Counter::Extracted) {
                    tracing::warn!(error = %e, "Could not persist counter");
                }
                tracing::info!(
                    question = index + 1,
                    question_id = ?CreateQuestionResponse::id_from(response),
                    "Extracted question submitted"
                );
                self.notifier
                    .success(&format!("Question {} created successfully.", index + 1));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, question = index + 1, "Question submission failed");
                self.with_candidate_id(id, |c| {
                    c.status = CandidateStatus::Failed {
                        reason: e.to_string(),
                        evaluated,
                    };
                });
                self.notifier
                    .error(&format!("Error creating question: {}", e.user_message("")));
                Err(e)
            }
        }
    }
}
