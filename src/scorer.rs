use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl PerformanceRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "excellent",
            PerformanceRating::Good => "good",
            PerformanceRating::Fair => "fair",
            PerformanceRating::NeedsPractice => "needs-practice",
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of correct answers rounded to the nearest integer, 0 for an
/// empty session.
pub fn score(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

pub fn rating(accuracy: u32, avg_response_time_ms: f64) -> PerformanceRating {
    if accuracy >= 90 && avg_response_time_ms < 3000.0 {
        PerformanceRating::Excellent
    } else if accuracy >= 70 {
        PerformanceRating::Good
    } else if accuracy >= 50 {
        PerformanceRating::Fair
    } else {
        PerformanceRating::NeedsPractice
    }
}

pub fn format_time(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        // Halves round up.
        let tenths = (ms + 50) / 100;
        format!("{}.{}s", tenths / 10, tenths % 10)
    }
}

/// Outcome of one answered quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub word_id: String,
    pub selected_index: usize,
    pub correct: bool,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub correct: usize,
    pub total: usize,
    pub accuracy: u32,
    pub average_response_time_ms: f64,
    pub rating: PerformanceRating,
}

impl SessionSummary {
    pub fn from_results(results: &[QuestionResult]) -> Self {
        let total = results.len();
        let correct = results.iter().filter(|r| r.correct).count();
        let accuracy = score(correct, total);
        let average_response_time_ms = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.response_time_ms).sum::<u64>() as f64 / total as f64
        };

        Self {
            correct,
            total,
            accuracy,
            average_response_time_ms,
            rating: rating(accuracy, average_response_time_ms),
        }
    }
}
