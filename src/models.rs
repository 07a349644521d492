use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single vocabulary entry from the catalog. Never mutated by the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub term: String,
    pub pronunciation: String,
    pub definition: String,
    pub example: String,
    pub difficulty: u8,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularySet {
    pub id: String,
    pub title: String,
    pub description: String,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    #[default]
    New,
    Learning,
    Mastered,
}

impl MasteryStatus {
    /// Derives the status from answer counters. Re-evaluated from scratch on
    /// every update, so a mastered word can fall back to learning.
    pub fn from_counts(correct: u32, incorrect: u32) -> Self {
        let total = correct as u64 + incorrect as u64;
        if total == 0 {
            return MasteryStatus::New;
        }
        let rate = correct as f64 / total as f64;
        if rate >= 0.8 && total >= 3 {
            MasteryStatus::Mastered
        } else {
            MasteryStatus::Learning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryStatus::New => "new",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Mastered => "mastered",
        }
    }
}

impl fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub timestamp: DateTime<Utc>,
    pub correct: bool,
    #[serde(rename = "responseTime")]
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub word_id: String,
    pub status: MasteryStatus,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub last_studied: Option<DateTime<Utc>>,
    pub average_response_time: Option<f64>,
    #[serde(default)]
    pub quiz_attempts: Vec<QuizAttempt>,
}

impl WordProgress {
    pub fn new(word_id: &str) -> Self {
        Self {
            word_id: word_id.to_string(),
            status: MasteryStatus::New,
            correct_count: 0,
            incorrect_count: 0,
            last_studied: None,
            average_response_time: None,
            quiz_attempts: Vec::new(),
        }
    }

    pub fn total_attempts(&self) -> u64 {
        self.correct_count as u64 + self.incorrect_count as u64
    }

    /// Fraction of correct answers, `None` before the first answer.
    pub fn correct_rate(&self) -> Option<f64> {
        let total = self.total_attempts();
        if total == 0 {
            None
        } else {
            Some(self.correct_count as f64 / total as f64)
        }
    }

    pub fn refresh_status(&mut self) {
        self.status = MasteryStatus::from_counts(self.correct_count, self.incorrect_count);
    }

    /// Mean of all stored attempt times, `None` when there are no attempts.
    pub fn refresh_average_response_time(&mut self) {
        if self.quiz_attempts.is_empty() {
            self.average_response_time = None;
            return;
        }
        let sum: u64 = self.quiz_attempts.iter().map(|a| a.response_time_ms).sum();
        self.average_response_time = Some(sum as f64 / self.quiz_attempts.len() as f64);
    }
}

/// Root progress document. One per user, persisted wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub words: HashMap<String, WordProgress>,
    #[serde(default)]
    pub last_study_session: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_sessions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Show the term, pick the definition.
    #[default]
    Definition,
    /// Show the definition, pick the term.
    Term,
}

impl QuestionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "definition" => Some(QuestionType::Definition),
            "term" => Some(QuestionType::Term),
            _ => None,
        }
    }

    /// The text of `word` that serves as an answer option for this type.
    pub fn option_for<'a>(&self, word: &'a Word) -> &'a str {
        match self {
            QuestionType::Definition => &word.definition,
            QuestionType::Term => &word.term,
        }
    }

    /// The text of `word` shown as the question prompt for this type.
    pub fn prompt_for<'a>(&self, word: &'a Word) -> &'a str {
        match self {
            QuestionType::Definition => &word.term,
            QuestionType::Term => &word.definition,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub word: Word,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuizQuestion {
    pub fn prompt(&self) -> &str {
        self.question_type.prompt_for(&self.word)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStatistics {
    pub mastered: usize,
    pub learning: usize,
    pub new: usize,
    pub total: usize,
}

impl SetStatistics {
    pub fn tally(&mut self, status: MasteryStatus) {
        match status {
            MasteryStatus::New => self.new += 1,
            MasteryStatus::Learning => self.learning += 1,
            MasteryStatus::Mastered => self.mastered += 1,
        }
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(MasteryStatus::from_counts(0, 0), MasteryStatus::New);
        assert_eq!(MasteryStatus::from_counts(2, 0), MasteryStatus::Learning);
        assert_eq!(MasteryStatus::from_counts(3, 0), MasteryStatus::Mastered);
        assert_eq!(MasteryStatus::from_counts(4, 1), MasteryStatus::Mastered);
        assert_eq!(MasteryStatus::from_counts(3, 1), MasteryStatus::Learning);
        assert_eq!(MasteryStatus::from_counts(0, 5), MasteryStatus::Learning);
    }

    #[test]
    fn test_huge_counters_do_not_overflow() {
        assert_eq!(
            MasteryStatus::from_counts(u32::MAX, u32::MAX),
            MasteryStatus::Learning
        );
        let mut progress = WordProgress::new("w1");
        progress.correct_count = u32::MAX;
        progress.incorrect_count = 1;
        assert_eq!(progress.total_attempts(), u32::MAX as u64 + 1);
        assert!(progress.correct_rate().unwrap() > 0.99);
        progress.refresh_status();
        assert_eq!(progress.status, MasteryStatus::Mastered);
    }

    #[test]
    fn test_average_response_time_empty() {
        let mut progress = WordProgress::new("w1");
        progress.refresh_average_response_time();
        assert!(progress.average_response_time.is_none());
        assert!(progress.correct_rate().is_none());
    }

    #[test]
    fn test_progress_serializes_camel_case() {
        let mut doc = UserProgress::default();
        doc.words.insert("w1".to_string(), WordProgress::new("w1"));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"lastStudySession\":null"));
        assert!(json.contains("\"totalSessions\":0"));
        assert!(json.contains("\"correctCount\":0"));
        assert!(json.contains("\"status\":\"new\""));
    }

    #[test]
    fn test_empty_object_is_default_document() {
        let doc: UserProgress = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, UserProgress::default());
    }

    #[test]
    fn test_question_type_parse() {
        assert_eq!(QuestionType::parse("Term"), Some(QuestionType::Term));
        assert_eq!(
            QuestionType::parse("definition"),
            Some(QuestionType::Definition)
        );
        assert_eq!(QuestionType::parse("audio"), None);
    }
}
