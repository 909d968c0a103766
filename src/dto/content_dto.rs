use crate::models::question::{Difficulty, QuestionOption};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentGroupRequest {
    pub chapter_name: String,
    pub subject: String,
    pub topic_tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentGroupResponse {
    #[serde(rename = "pdfId", deserialize_with = "super::deserialize_id")]
    pub pdf_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateQuestionResponse {
    #[serde(
        rename = "questionId",
        default,
        deserialize_with = "super::deserialize_optional_id"
    )]
    pub question_id: Option<String>,
}

impl CreateQuestionResponse {
    /// The created question's id. Bare acknowledgements carry none.
    pub fn id_from(response: JsonValue) -> Option<String> {
        serde_json::from_value::<Self>(response)
            .ok()
            .and_then(|r| r.question_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterQuestionPayload {
    #[serde(rename = "pdfId")]
    pub pdf_id: String,
    #[serde(rename = "topicId")]
    pub topic_id: String,
    pub question: String,
    pub difficulty_level: Difficulty,
    pub options: Vec<QuestionOption>,
    pub solution: String,
    #[serde(rename = "diagramPath")]
    pub diagram_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LetteredOptions {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl LetteredOptions {
    pub fn from_slice(options: &[String]) -> Self {
        let at = |i: usize| options.get(i).cloned().unwrap_or_default();
        Self {
            a: at(0),
            b: at(1),
            c: at(2),
            d: at(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousYearPayload {
    pub year: i32,
    pub subject: String,
    pub question: String,
    pub correct_answer: String,
    pub options: LetteredOptions,
    pub solution: String,
    pub diagram_url: String,
}
