use std::io::{self, BufRead, Write};
use std::time::Instant;

use vocab_trainer::catalog::Catalog;
use vocab_trainer::config::{Config, QuizRequest};
use vocab_trainer::logger;
use vocab_trainer::models::QuestionType;
use vocab_trainer::quiz::{self, QuizError};
use vocab_trainer::ranker;
use vocab_trainer::scorer::format_time;
use vocab_trainer::session::{start_flashcards, start_quiz};
use vocab_trainer::storage::{ProgressStore, SqliteStorage, StorageProvider};

const USAGE: &str = "Usage:
  vocab-trainer sets
  vocab-trainer stats <set-id>
  vocab-trainer quiz <set-id> [question-count] [definition|term]
  vocab-trainer study <set-id>
  vocab-trainer reset";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    logger::init_at(&config.log_path());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let catalog = Catalog::load_dir(&config.vocabulary_dir)?;
    let store = ProgressStore::new(SqliteStorage::open(&config.db_path())?);

    match command.as_str() {
        "sets" => list_sets(&catalog, &store),
        "stats" => show_stats(&catalog, &store, args.get(1)),
        "quiz" => {
            let mut query = format!("setId={}", args.get(1).map(String::as_str).unwrap_or(""));
            if let Some(count) = args.get(2) {
                query.push_str(&format!("&questionCount={}", count));
            }
            if let Some(question_type) = args.get(3) {
                query.push_str(&format!("&questionType={}", question_type));
            }
            let request = QuizRequest::from_query(&query)?;
            run_quiz(&catalog, &store, &request)?;
        }
        "study" => run_flashcards(&catalog, &store, args.get(1))?,
        "reset" => {
            store.clear()?;
            println!("All progress cleared.");
        }
        _ => println!("{}", USAGE),
    }

    Ok(())
}

fn list_sets<P: StorageProvider>(catalog: &Catalog, store: &ProgressStore<P>) {
    if catalog.sets().is_empty() {
        println!("No vocabulary sets found.");
        return;
    }
    for set in catalog.sets() {
        let ids: Vec<&str> = set.words.iter().map(|w| w.id.as_str()).collect();
        let stats = store.get_set_statistics(&ids);
        println!(
            "{:<16} {:<32} {}/{} mastered",
            set.id, set.title, stats.mastered, stats.total
        );
    }
}

fn show_stats<P: StorageProvider>(catalog: &Catalog, store: &ProgressStore<P>, set_id: Option<&String>) {
    let doc = store.get();
    println!("Sessions: {}", doc.total_sessions);
    if let Some(last) = doc.last_study_session {
        println!("Last session: {}", last.format("%Y-%m-%d %H:%M"));
    }

    let Some(set) = set_id.and_then(|id| catalog.get_set(id).ok()) else {
        let overall = store.get_overall_statistics();
        println!(
            "Words studied: {} ({} mastered, {} learning)",
            overall.total, overall.mastered, overall.learning
        );
        return;
    };

    let ids: Vec<&str> = set.words.iter().map(|w| w.id.as_str()).collect();
    let stats = store.get_set_statistics(&ids);
    println!(
        "{}: {} mastered, {} learning, {} new ({} total)",
        set.title, stats.mastered, stats.learning, stats.new, stats.total
    );

    let review = ranker::words_needing_review(&ids, &doc, chrono::Utc::now(), 5);
    if !review.is_empty() {
        println!("Review next:");
        for id in review {
            if let Some(word) = set.words.iter().find(|w| w.id == id) {
                println!("  {} - {}", word.term, word.definition);
            }
        }
    }
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn run_quiz<P: StorageProvider>(
    catalog: &Catalog,
    store: &ProgressStore<P>,
    request: &QuizRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let set = catalog.get_set(&request.set_id)?;
    let questions = match quiz::generate_for_store(
        store,
        &set.words,
        request.question_count,
        request.question_type,
    ) {
        Ok(questions) => questions,
        Err(QuizError::InsufficientWords { available }) => {
            println!(
                "'{}' has only {} words; a quiz needs at least {}.",
                set.title,
                available,
                quiz::MIN_WORDS
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut session = start_quiz(store, &set.id, questions)?;
    let total = session.questions.len();

    while let Some(question) = session.current() {
        let label = match question.question_type {
            QuestionType::Definition => "What does this mean",
            QuestionType::Term => "Which word matches",
        };
        println!();
        println!("[{}/{}] {}: {}", session.current_index + 1, total, label, question.prompt());
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }
        let option_count = question.options.len();

        let started = Instant::now();
        let Some(input) = read_line("> ")? else {
            break;
        };
        let Some(selected) = input
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=option_count).contains(n))
        else {
            println!("Enter a number between 1 and {}.", option_count);
            continue;
        };

        let elapsed = started.elapsed().as_millis() as u64;
        let outcome = session.answer(store, selected - 1, elapsed)?;
        if outcome.correct {
            println!("Correct! ({})", format_time(elapsed));
        } else {
            println!("Wrong. The answer was {}.", outcome.correct_index + 1);
        }
    }

    let summary = session.summary();
    println!();
    println!(
        "Score: {}/{} ({}%), average {} - {}",
        summary.correct,
        summary.total,
        summary.accuracy,
        format_time(summary.average_response_time_ms.round() as u64),
        summary.rating
    );
    Ok(())
}

fn run_flashcards<P: StorageProvider>(
    catalog: &Catalog,
    store: &ProgressStore<P>,
    set_id: Option<&String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let set = catalog.get_set(set_id.map(String::as_str).unwrap_or(""))?;
    let mut session = start_flashcards(store, &set.id, set.words.clone())?;

    while let Some(word) = session.current() {
        println!();
        println!("{} [{}]", word.term, word.pronunciation);
        let back = format!("{}\n  e.g. {}", word.definition, word.example);

        if read_line("(press enter to flip) ")?.is_none() {
            break;
        }
        session.flip();
        println!("  {}", back);

        let Some(input) = read_line("Remembered? [y/n] ")? else {
            break;
        };
        let progress = session.answer(store, input.eq_ignore_ascii_case("y"))?;
        println!("  status: {}", progress.status);
    }

    println!();
    println!(
        "Remembered {} of {} cards.",
        session.remembered_count(),
        session.current_index
    );
    Ok(())
}
