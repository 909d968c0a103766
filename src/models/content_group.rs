use serde::{Deserialize, Serialize};

/// A chapter/subject grouping that questions attach to through its generated id.
/// The backend and the original pages call it a "PDF".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentGroup {
    #[serde(default, rename = "pdfId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub chapter_name: String,
    pub subject: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
}

/// Splits the comma-separated tag input into trimmed, non-empty tags.
pub fn parse_topic_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
