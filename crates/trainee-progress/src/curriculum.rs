//! The fixed, ordered chapter list every progress record enumerates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Chapters of the Piper Alpha training simulation, in play order.
pub const DEFAULT_CHAPTERS: [&str; 7] = [
    "Briefing Room",
    "Arrival on Piper Alpha",
    "Maintenance Area",
    "Precursor to Disaster",
    "Explosion Simulation",
    "Escape Aftermath",
    "Debrief",
];

/// Identifier of a chapter, its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub String);

impl ChapterId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChapterId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ChapterId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// An ordered, duplicate-free, non-empty chapter sequence.
///
/// The position of a chapter in the sequence is its canonical sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Curriculum {
    chapters: Vec<ChapterId>,
    positions: HashMap<ChapterId, usize>,
}

impl Curriculum {
    /// Build a curriculum from chapter names in order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` if the list is empty, contains an
    /// empty name, or repeats a chapter.
    pub fn new<I, S>(chapters: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chapters: Vec<ChapterId> = chapters
            .into_iter()
            .map(|c| ChapterId(c.into()))
            .collect();

        if chapters.is_empty() {
            return Err(TrackerError::InvalidConfig(
                "curriculum must list at least one chapter".into(),
            ));
        }

        let mut positions = HashMap::with_capacity(chapters.len());
        for (idx, chapter) in chapters.iter().enumerate() {
            if chapter.0.trim().is_empty() {
                return Err(TrackerError::InvalidConfig(
                    "curriculum chapter names must not be empty".into(),
                ));
            }
            if positions.insert(chapter.clone(), idx).is_some() {
                return Err(TrackerError::InvalidConfig(format!(
                    "curriculum lists '{chapter}' more than once"
                )));
            }
        }

        Ok(Self {
            chapters,
            positions,
        })
    }

    /// Position of a chapter, or `None` if it is not part of the curriculum.
    pub fn position(&self, chapter: &ChapterId) -> Option<usize> {
        self.positions.get(chapter).copied()
    }

    pub fn contains(&self, chapter: &ChapterId) -> bool {
        self.positions.contains_key(chapter)
    }

    pub fn chapters(&self) -> &[ChapterId] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        let chapters = DEFAULT_CHAPTERS.iter().map(|c| ChapterId::from(*c)).collect::<Vec<_>>();
        let positions = chapters
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.clone(), idx))
            .collect();
        Self {
            chapters,
            positions,
        }
    }
}

impl TryFrom<Vec<String>> for Curriculum {
    type Error = TrackerError;

    fn try_from(chapters: Vec<String>) -> Result<Self> {
        Self::new(chapters)
    }
}

impl From<Curriculum> for Vec<String> {
    fn from(curriculum: Curriculum) -> Self {
        curriculum.chapters.into_iter().map(|c| c.0).collect()
    }
}
