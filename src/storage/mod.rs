//! Progress persistence.
//!
//! The whole [`UserProgress`] document lives under a single key and is always
//! read and written wholesale. Backends implement [`StorageProvider`] over the
//! raw JSON text; [`ProgressStore`] owns the parsing, fallback and update
//! rules on top of it.
//!
//! Updates are read-modify-write cycles over the full document and assume a
//! single writer.

use crate::logger;
use crate::models::{QuizAttempt, SetStatistics, UserProgress, WordProgress};
use chrono::Utc;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub const STORAGE_KEY: &str = "vocab-trainer-progress";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A swappable backend holding one raw document.
pub trait StorageProvider {
    /// Returns the stored document text, or `None` if nothing is stored.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, document: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

pub struct ProgressStore<P: StorageProvider> {
    provider: P,
}

impl<P: StorageProvider> ProgressStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current document. Missing, unreadable or corrupt data falls back to
    /// the default document and is only logged.
    pub fn get(&self) -> UserProgress {
        let raw = match self.provider.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return UserProgress::default(),
            Err(e) => {
                logger::log(&format!("Failed to load progress, using defaults: {}", e));
                return UserProgress::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                logger::log(&format!(
                    "Stored progress is corrupt, using defaults: {}",
                    e
                ));
                UserProgress::default()
            }
        }
    }

    pub fn set(&self, doc: &UserProgress) -> Result<()> {
        let raw = serde_json::to_string(doc)?;
        self.provider.save(&raw)
    }

    /// Stored record for `word_id`, or a fresh default that is not persisted.
    pub fn get_word_progress(&self, word_id: &str) -> WordProgress {
        self.get()
            .words
            .remove(word_id)
            .unwrap_or_else(|| WordProgress::new(word_id))
    }

    pub fn record_flashcard_answer(&self, word_id: &str, remembered: bool) -> Result<WordProgress> {
        self.update_word(word_id, |progress| {
            if remembered {
                progress.correct_count += 1;
            } else {
                progress.incorrect_count += 1;
            }
        })
    }

    pub fn record_quiz_answer(
        &self,
        word_id: &str,
        correct: bool,
        response_time_ms: u64,
    ) -> Result<WordProgress> {
        self.update_word(word_id, |progress| {
            if correct {
                progress.correct_count += 1;
            } else {
                progress.incorrect_count += 1;
            }
            progress.quiz_attempts.push(QuizAttempt {
                timestamp: Utc::now(),
                correct,
                response_time_ms,
            });
            progress.refresh_average_response_time();
        })
    }

    fn update_word<F>(&self, word_id: &str, apply: F) -> Result<WordProgress>
    where
        F: FnOnce(&mut WordProgress),
    {
        let mut doc = self.get();
        let progress = doc
            .words
            .entry(word_id.to_string())
            .or_insert_with(|| WordProgress::new(word_id));

        apply(progress);
        progress.refresh_status();
        progress.last_studied = Some(Utc::now());
        let updated = progress.clone();

        self.set(&doc)?;
        Ok(updated)
    }

    pub fn start_session(&self) -> Result<UserProgress> {
        let mut doc = self.get();
        doc.last_study_session = Some(Utc::now());
        doc.total_sessions += 1;
        self.set(&doc)?;
        logger::log(&format!("Started study session #{}", doc.total_sessions));
        Ok(doc)
    }

    pub fn clear(&self) -> Result<()> {
        logger::log("Clearing all stored progress");
        self.provider.clear()
    }

    /// Tallies statuses over `word_ids`; ids with no record count as new.
    pub fn get_set_statistics<S: AsRef<str>>(&self, word_ids: &[S]) -> SetStatistics {
        let doc = self.get();
        let mut stats = SetStatistics::default();
        for id in word_ids {
            let status = doc
                .words
                .get(id.as_ref())
                .map(|p| p.status)
                .unwrap_or_default();
            stats.tally(status);
        }
        stats
    }

    pub fn get_overall_statistics(&self) -> SetStatistics {
        let doc = self.get();
        let mut stats = SetStatistics::default();
        for progress in doc.words.values() {
            stats.tally(progress.status);
        }
        stats
    }
}
