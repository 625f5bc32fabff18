//! Summary statistics and remark classification for a progress record.

use serde::{Deserialize, Serialize};

use super::types::{ChapterStatus, NormalizedChapters};

/// Aggregates over one normalized record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Entries with status Completed.
    pub completed_count: usize,
    /// Number of entries, the curriculum length.
    pub total_count: usize,
    /// Mean of attempted scores to one decimal, 0 if nothing was attempted.
    pub average_score: f64,
    /// Percentage of completed entries to one decimal.
    pub completion_rate: f64,
}

/// Round to one decimal place, ties to even.
///
/// Averages of a few integer scores are exact in binary, so `x.x5` values
/// are true ties here and go to the even tenth (2.25 -> 2.2, 0.75 -> 0.8).
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Compute the summary of a normalized record.
pub fn summarize(chapters: &NormalizedChapters) -> Summary {
    let total_count = chapters.len();
    let completed_count = chapters
        .iter()
        .filter(|r| r.status == ChapterStatus::Completed)
        .count();

    let attempted: Vec<u8> = chapters.iter().filter_map(|r| r.score.points()).collect();
    let average_score = if attempted.is_empty() {
        0.0
    } else {
        let sum: u32 = attempted.iter().map(|&p| u32::from(p)).sum();
        round1(f64::from(sum) / attempted.len() as f64)
    };

    let completion_rate = if total_count == 0 {
        0.0
    } else {
        round1(completed_count as f64 / total_count as f64 * 100.0)
    };

    Summary {
        completed_count,
        total_count,
        average_score,
        completion_rate,
    }
}

/// Which closing remark a report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemarkTier {
    FullCompletion,
    Partial,
    NotStarted,
}

/// Pick the remark tier. Full completion is checked first, so an empty
/// record (0 of 0) counts as complete.
pub fn classify_remark(summary: &Summary) -> RemarkTier {
    if summary.completed_count == summary.total_count {
        RemarkTier::FullCompletion
    } else if summary.completed_count == 0 {
        RemarkTier::NotStarted
    } else {
        RemarkTier::Partial
    }
}

/// Tier plus the values a renderer needs to word the remark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remark {
    pub tier: RemarkTier,
    pub trainee_name: String,
    pub completed_count: usize,
    pub total_count: usize,
    pub completion_rate: f64,
}

pub fn remark_for(trainee_name: &str, summary: &Summary) -> Remark {
    Remark {
        tier: classify_remark(summary),
        trainee_name: trainee_name.to_string(),
        completed_count: summary.completed_count,
        total_count: summary.total_count,
        completion_rate: summary.completion_rate,
    }
}
