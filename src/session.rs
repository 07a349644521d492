//! Walks a user through a generated quiz or a flashcard deck, feeding each
//! answer into the progress store.

use crate::logger;
use crate::models::{QuizQuestion, Word, WordProgress};
use crate::scorer::{QuestionResult, SessionSummary};
use crate::storage::{ProgressStore, StorageError, StorageProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session is already complete")]
    SessionComplete,

    #[error("Option {index} is out of range for a question with {available} options")]
    InvalidOption { index: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: usize,
    pub progress: WordProgress,
}

#[derive(Debug)]
pub struct QuizSession {
    pub set_id: String,
    pub questions: Vec<QuizQuestion>,
    pub current_index: usize,
    pub results: Vec<QuestionResult>,
}

/// Counts a new study session in the store and wraps the questions.
pub fn start_quiz<P: StorageProvider>(
    store: &ProgressStore<P>,
    set_id: &str,
    questions: Vec<QuizQuestion>,
) -> Result<QuizSession> {
    store.start_session()?;
    Ok(QuizSession::new(set_id, questions))
}

impl QuizSession {
    pub fn new(set_id: &str, questions: Vec<QuizQuestion>) -> Self {
        Self {
            set_id: set_id.to_string(),
            questions,
            current_index: 0,
            results: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// Records the answer to the current question and moves to the next one.
    pub fn answer<P: StorageProvider>(
        &mut self,
        store: &ProgressStore<P>,
        selected_index: usize,
        response_time_ms: u64,
    ) -> Result<AnswerOutcome> {
        let question = self.current().ok_or(SessionError::SessionComplete)?;
        if selected_index >= question.options.len() {
            return Err(SessionError::InvalidOption {
                index: selected_index,
                available: question.options.len(),
            });
        }

        let correct = question.is_correct(selected_index);
        let correct_index = question.correct_index;
        let question_id = question.id.clone();
        let word_id = question.word.id.clone();

        let progress = store.record_quiz_answer(&word_id, correct, response_time_ms)?;
        logger::log(&format!(
            "Quiz '{}' {}: word {} answered {} in {}ms",
            self.set_id,
            question_id,
            word_id,
            if correct { "correctly" } else { "incorrectly" },
            response_time_ms
        ));

        self.results.push(QuestionResult {
            question_id,
            word_id,
            selected_index,
            correct,
            response_time_ms,
        });
        self.current_index += 1;

        Ok(AnswerOutcome {
            correct,
            correct_index,
            progress,
        })
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_results(&self.results)
    }
}

#[derive(Debug)]
pub struct FlashcardSession {
    pub set_id: String,
    pub words: Vec<Word>,
    pub current_index: usize,
    pub showing_back: bool,
    remembered: usize,
}

pub fn start_flashcards<P: StorageProvider>(
    store: &ProgressStore<P>,
    set_id: &str,
    words: Vec<Word>,
) -> Result<FlashcardSession> {
    store.start_session()?;
    Ok(FlashcardSession::new(set_id, words))
}

impl FlashcardSession {
    pub fn new(set_id: &str, words: Vec<Word>) -> Self {
        Self {
            set_id: set_id.to_string(),
            words,
            current_index: 0,
            showing_back: false,
            remembered: 0,
        }
    }

    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.current_index)
    }

    pub fn flip(&mut self) {
        self.showing_back = !self.showing_back;
    }

    pub fn is_flipped(&self) -> bool {
        self.showing_back
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.words.len()
    }

    pub fn remembered_count(&self) -> usize {
        self.remembered
    }

    pub fn answer<P: StorageProvider>(
        &mut self,
        store: &ProgressStore<P>,
        remembered: bool,
    ) -> Result<WordProgress> {
        let word = self.current().ok_or(SessionError::SessionComplete)?;
        let progress = store.record_flashcard_answer(&word.id, remembered)?;

        if remembered {
            self.remembered += 1;
        }
        self.current_index += 1;
        self.showing_back = false;
        Ok(progress)
    }
}
