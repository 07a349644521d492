use crate::models::{MasteryStatus, UserProgress, WordProgress};
use chrono::{DateTime, Utc};

/// Priority for words that have never been answered.
pub const UNSEEN_PRIORITY: f64 = 50.0;

/// Stand-in day count for answered words with no study timestamp.
pub const NEVER_STUDIED_DAYS: f64 = 30.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Review priority of a word: higher means more in need of practice.
///
/// Inaccuracy on a 0-100 scale plus fractional days since the word was last
/// studied. The two terms are not normalized against each other.
pub fn priority(progress: Option<&WordProgress>, now: DateTime<Utc>) -> f64 {
    let Some(progress) = progress else {
        return UNSEEN_PRIORITY;
    };
    let Some(rate) = progress.correct_rate() else {
        return UNSEEN_PRIORITY;
    };

    let days = match progress.last_studied {
        Some(last) => (now - last).num_milliseconds() as f64 / MILLIS_PER_DAY,
        None => NEVER_STUDIED_DAYS,
    };

    (1.0 - rate) * 100.0 + days
}

/// Orders `word_ids` by descending priority. `sort_by` is stable, so ids with
/// equal priority keep their input order.
pub fn rank<S: AsRef<str>>(
    word_ids: &[S],
    progress: &UserProgress,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = word_ids
        .iter()
        .map(|id| {
            let id = id.as_ref();
            (priority(progress.words.get(id), now), id)
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, id)| id.to_string()).collect()
}

/// Ranked ids that are not yet mastered, at most `limit` of them.
pub fn words_needing_review<S: AsRef<str>>(
    word_ids: &[S],
    progress: &UserProgress,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<String> {
    rank(word_ids, progress, now)
        .into_iter()
        .filter(|id| {
            progress.words.get(id).map(|p| p.status) != Some(MasteryStatus::Mastered)
        })
        .take(limit)
        .collect()
}
