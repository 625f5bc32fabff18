//! Field-level validation of raw chapter submissions.
//!
//! Runs before normalization. Chapter membership and uniqueness are checked
//! later by [`normalize`](super::normalize), against the curriculum.

use crate::config::ScoreBounds;
use crate::error::ValidationError;

use super::types::{ChapterResult, ChapterStatus, ChapterSubmission, RawScore, Score, NOT_ATTEMPTED};

/// Validate one raw chapter entry into a typed result.
pub fn validate_chapter(
    entry: &ChapterSubmission,
    bounds: ScoreBounds,
) -> Result<ChapterResult, ValidationError> {
    let out_of_range = || ValidationError::ScoreOutOfRange {
        min: bounds.min,
        max: bounds.max,
        got: entry.score.to_string(),
    };

    let score = match &entry.score {
        RawScore::Int(n) if bounds.contains(*n) => {
            Score::Points(u8::try_from(*n).map_err(|_| out_of_range())?)
        }
        RawScore::Text(s) if s == NOT_ATTEMPTED => Score::NotAttempted,
        _ => return Err(out_of_range()),
    };

    let status: ChapterStatus = entry.status.parse()?;

    Ok(ChapterResult::new(entry.chapter.as_str(), score, status))
}

/// Validate a whole submission. At least one entry is required.
///
/// Stops at the first invalid entry.
pub fn validate_submission(
    entries: &[ChapterSubmission],
    bounds: ScoreBounds,
) -> Result<Vec<ChapterResult>, ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::EmptySubmission);
    }
    entries
        .iter()
        .map(|entry| validate_chapter(entry, bounds))
        .collect()
}
