use crate::logger;
use crate::models::{QuestionType, QuizQuestion, UserProgress, Word};
use crate::ranker;
use crate::storage::{ProgressStore, StorageProvider};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use thiserror::Error;

/// Words needed for one correct option plus three distractors.
pub const MIN_WORDS: usize = 4;

pub const DISTRACTOR_COUNT: usize = MIN_WORDS - 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("Not enough words for a quiz: need at least 4, got {available}")]
    InsufficientWords { available: usize },

    #[error("Not enough distinct answer options for word '{word_id}'")]
    InsufficientDistractors { word_id: String },
}

/// Builds up to `count` multiple-choice questions for the highest-priority
/// words. Question order is shuffled, so it does not reveal priority.
pub fn generate<R: Rng + ?Sized>(
    words: &[Word],
    count: usize,
    question_type: QuestionType,
    progress: &UserProgress,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, QuizError> {
    if words.len() < MIN_WORDS {
        return Err(QuizError::InsufficientWords {
            available: words.len(),
        });
    }

    let by_id: HashMap<&str, &Word> = words.iter().map(|w| (w.id.as_str(), w)).collect();
    let ids: Vec<&str> = words.iter().map(|w| w.id.as_str()).collect();
    let ranked = ranker::rank(&ids, progress, now);

    let mut questions = Vec::new();
    for (index, id) in ranked.iter().take(count.min(words.len())).enumerate() {
        let Some(word) = by_id.get(id.as_str()) else {
            continue;
        };
        questions.push(build_question(index, word, words, question_type, rng)?);
    }

    questions.shuffle(rng);
    logger::log(&format!(
        "Generated {} {:?} questions from {} words",
        questions.len(),
        question_type,
        words.len()
    ));
    Ok(questions)
}

/// Same as [`generate`] with the store's current document, the current time
/// and the thread RNG.
pub fn generate_for_store<P: StorageProvider>(
    store: &ProgressStore<P>,
    words: &[Word],
    count: usize,
    question_type: QuestionType,
) -> Result<Vec<QuizQuestion>, QuizError> {
    generate(
        words,
        count,
        question_type,
        &store.get(),
        Utc::now(),
        &mut rand::thread_rng(),
    )
}

fn build_question<R: Rng + ?Sized>(
    index: usize,
    target: &Word,
    words: &[Word],
    question_type: QuestionType,
    rng: &mut R,
) -> Result<QuizQuestion, QuizError> {
    let correct = question_type.option_for(target);

    // One candidate per distinct option text, never the correct text.
    let mut pool: Vec<&str> = Vec::new();
    for word in words.iter().filter(|w| w.id != target.id) {
        let option = question_type.option_for(word);
        if option != correct && !pool.contains(&option) {
            pool.push(option);
        }
    }

    if pool.len() < DISTRACTOR_COUNT {
        return Err(QuizError::InsufficientDistractors {
            word_id: target.id.clone(),
        });
    }

    let mut options: Vec<String> = pool
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .map(|o| o.to_string())
        .collect();
    options.push(correct.to_string());
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|o| o == correct)
        .unwrap_or_default();

    Ok(QuizQuestion {
        id: format!("q-{}", index),
        word: target.clone(),
        question_type,
        options,
        correct_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordProgress;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn word(id: &str) -> Word {
        Word {
            id: id.to_string(),
            term: format!("term-{}", id),
            pronunciation: String::new(),
            definition: format!("definition of {}", id),
            example: String::new(),
            difficulty: 1,
            category: "noun".to_string(),
        }
    }

    fn words(n: usize) -> Vec<Word> {
        (0..n).map(|i| word(&format!("w{}", i))).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_three_words_is_insufficient() {
        let result = generate(
            &words(3),
            10,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        );
        assert_eq!(result, Err(QuizError::InsufficientWords { available: 3 }));
    }

    #[test]
    fn test_count_capped_by_available_words() {
        let questions = generate(
            &words(4),
            10,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(questions.len(), 4);

        let questions = generate(
            &words(12),
            5,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(questions.len(), 5);
    }

    #[test]
    fn test_definition_questions_are_well_formed() {
        let questions = generate(
            &words(8),
            8,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        )
        .unwrap();

        for q in &questions {
            assert_eq!(q.options.len(), 4);
            let distinct: HashSet<&String> = q.options.iter().collect();
            assert_eq!(distinct.len(), 4);
            assert_eq!(q.options[q.correct_index], q.word.definition);
            assert_eq!(q.prompt(), q.word.term);
            assert!(q.is_correct(q.correct_index));
        }

        let ids: HashSet<String> = questions.iter().map(|q| q.id.clone()).collect();
        let expected: HashSet<String> = (0..8).map(|i| format!("q-{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_term_questions_use_terms_as_options() {
        let questions = generate(
            &words(5),
            5,
            QuestionType::Term,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        )
        .unwrap();

        for q in &questions {
            assert_eq!(q.correct_option(), q.word.term);
            assert_eq!(q.prompt(), q.word.definition);
            assert!(q.options.iter().all(|o| o.starts_with("term-")));
        }
    }

    #[test]
    fn test_selection_follows_priority() {
        let now = Utc::now();
        let mut progress = UserProgress::default();
        for i in 0..6 {
            let id = format!("w{}", i);
            let mut record = WordProgress::new(&id);
            record.correct_count = 5;
            record.last_studied = Some(now - Duration::minutes(1));
            record.refresh_status();
            progress.words.insert(id, record);
        }
        let mut weak = WordProgress::new("w6");
        weak.incorrect_count = 3;
        weak.last_studied = Some(now);
        weak.refresh_status();
        progress.words.insert("w6".to_string(), weak);

        let questions = generate(
            &words(8),
            2,
            QuestionType::Definition,
            &progress,
            now,
            &mut rng(),
        )
        .unwrap();

        let selected: HashSet<&str> = questions.iter().map(|q| q.word.id.as_str()).collect();
        assert_eq!(selected, HashSet::from(["w6", "w7"]));
    }

    #[test]
    fn test_same_seed_same_quiz() {
        let a = generate(
            &words(10),
            6,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        )
        .unwrap();
        let b = generate(
            &words(10),
            6,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_definitions_are_not_offered_twice() {
        let mut list = words(5);
        list[1].definition = list[2].definition.clone();
        list[3].definition = list[2].definition.clone();

        let result = generate(
            &list,
            5,
            QuestionType::Definition,
            &UserProgress::default(),
            Utc::now(),
            &mut rng(),
        );
        assert!(matches!(
            result,
            Err(QuizError::InsufficientDistractors { .. })
        ));
    }

    #[test]
    fn test_generate_for_store() {
        let store = ProgressStore::new(crate::storage::MemoryStorage::new());
        let questions =
            generate_for_store(&store, &words(6), 3, QuestionType::Definition).unwrap();
        assert_eq!(questions.len(), 3);
    }
}
