pub mod catalog;
pub mod config;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod ranker;
pub mod scorer;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogError};
pub use config::{Config, ConfigError, QuizRequest};
pub use models::{
    MasteryStatus, QuestionType, QuizAttempt, QuizQuestion, SetStatistics, UserProgress,
    VocabularySet, Word, WordProgress,
};
pub use quiz::{QuizError, generate, generate_for_store};
pub use ranker::{priority, rank};
pub use scorer::{PerformanceRating, SessionSummary, format_time, rating, score};
pub use session::{FlashcardSession, QuizSession, SessionError};
pub use storage::{MemoryStorage, ProgressStore, SqliteStorage, StorageError, StorageProvider};
