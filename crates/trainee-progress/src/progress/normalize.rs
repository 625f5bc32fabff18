//! Normalization of a partial submission against the curriculum.

use std::collections::HashSet;

use crate::curriculum::Curriculum;
use crate::error::ValidationError;

use super::types::{ChapterResult, NormalizedChapters};

/// Complete and order a validated, partial set of chapter results.
///
/// 1. Every chapter must belong to the curriculum (`UnknownChapter`).
/// 2. No chapter may appear twice (`DuplicateChapter`).
/// 3. Each omitted curriculum chapter is filled in as not attempted.
/// 4. Entries are sorted by curriculum position.
///
/// Submitted entries are carried over unmodified. The function performs no
/// I/O and reads no clock.
pub fn normalize(
    submitted: Vec<ChapterResult>,
    curriculum: &Curriculum,
) -> Result<NormalizedChapters, ValidationError> {
    if let Some(unknown) = submitted.iter().find(|r| !curriculum.contains(&r.chapter)) {
        return Err(ValidationError::UnknownChapter(unknown.chapter.to_string()));
    }

    let mut seen = HashSet::with_capacity(submitted.len());
    for result in &submitted {
        if !seen.insert(result.chapter.clone()) {
            return Err(ValidationError::DuplicateChapter(result.chapter.to_string()));
        }
    }

    let missing: Vec<ChapterResult> = curriculum
        .chapters()
        .iter()
        .filter(|chapter| !seen.contains(*chapter))
        .cloned()
        .map(ChapterResult::not_attempted)
        .collect();

    log::debug!(
        "normalizing {} submitted chapter(s), synthesizing {}",
        submitted.len(),
        missing.len()
    );

    let mut complete = submitted;
    complete.extend(missing);
    // Membership was checked above, so every entry has a position.
    complete.sort_by_key(|r| curriculum.position(&r.chapter).unwrap_or(usize::MAX));

    Ok(NormalizedChapters::from_ordered(complete))
}
