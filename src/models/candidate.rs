use crate::models::question::{Difficulty, QuestionOption, OPTION_COUNT};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question as it comes out of the extraction service, before review.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedMcq {
    pub question: String,
    pub options: Vec<QuestionOption>,
}

/// Lifecycle of one extracted question on the review page.
///
/// `Evaluating` and `Submitting` are in flight; every other state is stable.
/// A failed request lands in `Failed`, which remembers whether the candidate
/// had already been evaluated so the page can fall back to the right label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CandidateStatus {
    #[default]
    Draft,
    Evaluating {
        evaluated: bool,
    },
    Evaluated,
    Submitting {
        evaluated: bool,
    },
    Submitted,
    Failed {
        reason: String,
        evaluated: bool,
    },
}

impl CandidateStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CandidateStatus::Evaluating { .. } | CandidateStatus::Submitting { .. }
        )
    }

    pub fn is_evaluated(&self) -> bool {
        match self {
            CandidateStatus::Evaluated => true,
            CandidateStatus::Evaluating { evaluated }
            | CandidateStatus::Submitting { evaluated }
            | CandidateStatus::Failed { evaluated, .. } => *evaluated,
            _ => false,
        }
    }

    pub fn can_evaluate(&self) -> bool {
        !self.is_in_flight() && *self != CandidateStatus::Submitted
    }

    pub fn can_submit(&self) -> bool {
        self.can_evaluate()
    }

    /// Display label. A failed candidate shows the stable state it fell back
    /// to; the failure itself is available from [`failure_reason`](Self::failure_reason).
    pub fn label(&self) -> &'static str {
        match self {
            CandidateStatus::Draft => "Draft",
            CandidateStatus::Evaluating { .. } => "Evaluating...",
            CandidateStatus::Evaluated => "Evaluated",
            CandidateStatus::Submitting { .. } => "Submitting...",
            CandidateStatus::Submitted => "Submitted",
            CandidateStatus::Failed { evaluated: true, .. } => "Evaluated",
            CandidateStatus::Failed { evaluated: false, .. } => "Draft",
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            CandidateStatus::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<QuestionOption>,
    pub solution: String,
    pub difficulty_level: Difficulty,
    pub topic: String,
    pub diagram_path: String,
    pub status: CandidateStatus,
}

impl Candidate {
    pub fn from_extracted(mcq: ExtractedMcq) -> Self {
        let mut options = mcq.options;
        if options.len() < OPTION_COUNT {
            options.resize(OPTION_COUNT, QuestionOption::default());
        }
        Self {
            id: Uuid::new_v4(),
            question: mcq.question,
            options,
            solution: String::new(),
            difficulty_level: Difficulty::Medium,
            topic: String::new(),
            diagram_path: String::new(),
            status: CandidateStatus::Draft,
        }
    }
}
