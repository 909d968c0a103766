use super::KeyValueStore;
use crate::error::Result;
use std::sync::Arc;

pub const CHAPTER_NAME_KEY: &str = "chapterName";
pub const SUBJECT_KEY: &str = "subject";
pub const TOPIC_TAGS_KEY: &str = "topicTags";
pub const AUTH_TOKEN_KEY: &str = "adminAuthToken";

/// Running counts of questions submitted from each entry page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    ChapterWise,
    PreviousYear,
    Extracted,
}

impl Counter {
    pub const ALL: [Counter; 3] = [Counter::ChapterWise, Counter::PreviousYear, Counter::Extracted];

    pub fn key(&self) -> &'static str {
        match self {
            Counter::ChapterWise => "chapterwiseSubmittedCount",
            Counter::PreviousYear => "previousYearSubmittedCount",
            Counter::Extracted => "extractedSubmittedCount",
        }
    }
}

/// Chapter/subject/topic values the chapter-wise page restores at mount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentGroupDraft {
    pub chapter_name: String,
    pub subject: String,
    pub topic_tags: String,
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(super::MemoryStore::new()))
    }

    /// The stored count, or 0 when the key is missing or not a number.
    pub fn submitted_count(&self, counter: Counter) -> u64 {
        self.store
            .get(counter.key())
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }

    pub fn record_submission(&self, counter: Counter) -> Result<u64> {
        let next = self.submitted_count(counter).saturating_add(1);
        self.store.set(counter.key(), &next.to_string())?;
        Ok(next)
    }

    pub fn reset_count(&self, counter: Counter) -> Result<()> {
        self.store.remove(counter.key())
    }

    pub fn content_group_draft(&self) -> ContentGroupDraft {
        ContentGroupDraft {
            chapter_name: self.store.get(CHAPTER_NAME_KEY).unwrap_or_default(),
            subject: self.store.get(SUBJECT_KEY).unwrap_or_default(),
            topic_tags: self.store.get(TOPIC_TAGS_KEY).unwrap_or_default(),
        }
    }

    pub fn save_content_group_draft(&self, draft: &ContentGroupDraft) -> Result<()> {
        self.store.set(CHAPTER_NAME_KEY, &draft.chapter_name)?;
        self.store.set(SUBJECT_KEY, &draft.subject)?;
        self.store.set(TOPIC_TAGS_KEY, &draft.topic_tags)
    }

    pub fn clear_content_group_draft(&self) -> Result<()> {
        self.store.remove(CHAPTER_NAME_KEY)?;
        self.store.remove(SUBJECT_KEY)?;
        self.store.remove(TOPIC_TAGS_KEY)
    }

    pub fn auth_token(&self) -> Option<String> {
        self.store
            .get(AUTH_TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        self.store.set(AUTH_TOKEN_KEY, token)
    }

    pub fn clear_auth_token(&self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}
