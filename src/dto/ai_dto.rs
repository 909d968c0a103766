use crate::models::candidate::ExtractedMcq;
use crate::models::question::{mark_answer, QuestionOption, OPTION_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub mcqs: Option<Vec<RawMcq>>,
    #[serde(default)]
    pub mcq_markdown: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawOptions {
    Detailed(Vec<QuestionOption>),
    Plain(Vec<String>),
    Lettered(BTreeMap<String, String>),
}

impl Default for RawOptions {
    fn default() -> Self {
        RawOptions::Plain(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMcq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: RawOptions,
    #[serde(default)]
    pub answer: Option<String>,
}

impl RawMcq {
    pub fn into_extracted(self) -> ExtractedMcq {
        let mut options: Vec<QuestionOption> = match self.options {
            RawOptions::Detailed(opts) => opts,
            RawOptions::Plain(texts) => texts.into_iter().map(QuestionOption::new).collect(),
            // BTreeMap keeps a..d in order
            RawOptions::Lettered(map) => map.into_values().map(QuestionOption::new).collect(),
        };
        if options.len() < OPTION_COUNT {
            options.resize(OPTION_COUNT, QuestionOption::default());
        }
        if let Some(answer) = self.answer.as_deref() {
            mark_answer(&mut options, answer);
        }
        ExtractedMcq {
            question: self.question.trim().to_string(),
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessRequest {
    pub mcq: String,
    pub chapter: String,
    pub topics: Vec<String>,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessResponse {
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_optional_id")]
    pub topic_id: Option<String>,
}
