use crate::models::QuestionType;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const DATA_DIR_ENV: &str = "VOCAB_TRAINER_DATA_DIR";
pub const VOCAB_DIR_ENV: &str = "VOCAB_TRAINER_VOCAB_DIR";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Quiz request is missing a setId")]
    MissingSetId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub vocabulary_dir: PathBuf,
    pub default_question_count: usize,
}

impl Config {
    /// Environment overrides first, then platform defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let vocabulary_dir = std::env::var(VOCAB_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("vocabulary"));

        Self {
            data_dir,
            vocabulary_dir,
            default_question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("progress.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("vocab_trainer.log")
    }
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\vocab-trainer")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/vocab-trainer")
    }
}

/// A quiz configured by the UI: which set, how many questions, which way
/// round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub set_id: String,
    pub question_count: usize,
    pub question_type: QuestionType,
}

impl QuizRequest {
    /// Parses `setId=...&questionCount=...&questionType=...`. A missing or
    /// unparsable count falls back to the default; a missing set id is an
    /// error.
    pub fn from_query(query: &str) -> Result<Self, ConfigError> {
        let mut set_id = None;
        let mut question_count = DEFAULT_QUESTION_COUNT;
        let mut question_type = QuestionType::default();

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "setId" if !value.is_empty() => set_id = Some(value.to_string()),
                "questionCount" => {
                    if let Ok(count) = value.parse::<usize>()
                        && count > 0
                    {
                        question_count = count;
                    }
                }
                "questionType" => {
                    if let Some(parsed) = QuestionType::parse(value) {
                        question_type = parsed;
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            set_id: set_id.ok_or(ConfigError::MissingSetId)?,
            question_count,
            question_type,
        })
    }
}
