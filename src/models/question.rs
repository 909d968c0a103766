use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OPTION_COUNT: usize = 4;
pub const OPTION_LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Simple,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Simple => "simple",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Maps the assessment service's vocabulary, which says `easy` for `simple`.
    pub fn from_assessment(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "simple" => Some(Difficulty::Simple),
            "medium" | "moderate" => Some(Difficulty::Medium),
            "hard" | "difficult" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Difficulty::Simple),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionOption {
    pub option_text: String,
    pub is_correct: bool,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            option_text: text.into(),
            is_correct: false,
        }
    }
}

pub fn blank_options() -> Vec<QuestionOption> {
    vec![QuestionOption::default(); OPTION_COUNT]
}

/// Sets the correctness flag of one option. Marking an option correct clears
/// every other option; clearing one leaves the rest alone.
pub fn set_correct(options: &mut [QuestionOption], index: usize, is_correct: bool) {
    for (i, opt) in options.iter_mut().enumerate() {
        if i == index {
            opt.is_correct = is_correct;
        } else if is_correct {
            opt.is_correct = false;
        }
    }
}

/// Marks exactly the option named by an answer letter (`a`, `B`, `(c)` ...).
/// Returns the chosen index, or `None` without touching the options when the
/// letter does not name one of them.
pub fn mark_answer(options: &mut [QuestionOption], answer: &str) -> Option<usize> {
    let index = answer_index(answer).filter(|i| *i < options.len())?;
    for (i, opt) in options.iter_mut().enumerate() {
        opt.is_correct = i == index;
    }
    Some(index)
}

pub fn answer_index(answer: &str) -> Option<usize> {
    let letter = answer
        .trim()
        .trim_matches(|c| matches!(c, '(' | ')' | '[' | ']' | '.'))
        .chars()
        .next()?
        .to_ascii_uppercase();
    OPTION_LETTERS.iter().position(|l| *l == letter)
}

pub fn correct_index(options: &[QuestionOption]) -> Option<usize> {
    options.iter().position(|o| o.is_correct)
}

/// Renders a question the way the assessment service expects it:
/// the stem on the first line, then `A. ...` through `D. ...`.
pub fn render_mcq_text<'a>(question: &str, options: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = question.to_string();
    for (i, opt) in options.into_iter().enumerate() {
        let letter = OPTION_LETTERS
            .get(i)
            .copied()
            .unwrap_or(char::from(b'A' + (i as u8 % 26)));
        text.push('\n');
        text.push(letter);
        text.push_str(". ");
        text.push_str(opt);
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Subject {
    #[default]
    Physics,
    Chemistry,
    Biology,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physics" => Ok(Subject::Physics),
            "chemistry" => Ok(Subject::Chemistry),
            "biology" => Ok(Subject::Biology),
            other => Err(format!("Unknown subject: {}", other)),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
