//! Data structures for chapter results and progress records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curriculum::ChapterId;
use crate::error::ValidationError;

/// Wire spelling of the not-attempted score sentinel.
pub const NOT_ATTEMPTED: &str = "NA";

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Score as it appears on the wire: an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Int(i64),
    Text(String),
}

impl From<i64> for RawScore {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for RawScore {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for RawScore {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl std::fmt::Display for RawScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// Score of one chapter. Serialized as an integer or `"NA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScore", into = "RawScore")]
pub enum Score {
    Points(u8),
    NotAttempted,
}

impl Score {
    pub fn points(&self) -> Option<u8> {
        match self {
            Self::Points(p) => Some(*p),
            Self::NotAttempted => None,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Points(p) => write!(f, "{p}"),
            Self::NotAttempted => f.write_str(NOT_ATTEMPTED),
        }
    }
}

impl TryFrom<RawScore> for Score {
    type Error = String;

    fn try_from(raw: RawScore) -> Result<Self, Self::Error> {
        match raw {
            RawScore::Int(n) => u8::try_from(n)
                .map(Self::Points)
                .map_err(|_| format!("score {n} out of range")),
            RawScore::Text(s) if s == NOT_ATTEMPTED => Ok(Self::NotAttempted),
            RawScore::Text(s) => Err(format!("score must be an integer or 'NA', got '{s}'")),
        }
    }
}

impl From<Score> for RawScore {
    fn from(score: Score) -> Self {
        match score {
            Score::Points(p) => Self::Int(i64::from(p)),
            Score::NotAttempted => Self::Text(NOT_ATTEMPTED.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Completion status of one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterStatus {
    Completed,
    Pending,
    #[serde(rename = "Not Completed")]
    NotCompleted,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::NotCompleted => "Not Completed",
        }
    }
}

impl std::fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChapterStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Completed" => Ok(Self::Completed),
            "Pending" => Ok(Self::Pending),
            "Not Completed" => Ok(Self::NotCompleted),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Chapter result
// ---------------------------------------------------------------------------

/// One chapter entry as submitted by the simulation, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSubmission {
    pub chapter: String,
    pub score: RawScore,
    pub status: String,
}

impl ChapterSubmission {
    pub fn new(chapter: impl Into<String>, score: impl Into<RawScore>, status: impl Into<String>) -> Self {
        Self {
            chapter: chapter.into(),
            score: score.into(),
            status: status.into(),
        }
    }
}

/// A validated result for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterResult {
    pub chapter: ChapterId,
    pub score: Score,
    pub status: ChapterStatus,
}

impl ChapterResult {
    pub fn new(chapter: impl Into<ChapterId>, score: Score, status: ChapterStatus) -> Self {
        Self {
            chapter: chapter.into(),
            score,
            status,
        }
    }

    /// Placeholder for a chapter absent from a submission.
    pub fn not_attempted(chapter: ChapterId) -> Self {
        Self {
            chapter,
            score: Score::NotAttempted,
            status: ChapterStatus::NotCompleted,
        }
    }
}

/// A complete chapter list: one entry per curriculum chapter, in curriculum
/// order. Only [`normalize`](super::normalize) builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedChapters(Vec<ChapterResult>);

impl NormalizedChapters {
    pub(crate) fn from_ordered(entries: Vec<ChapterResult>) -> Self {
        Self(entries)
    }

    pub fn as_slice(&self) -> &[ChapterResult] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChapterResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a NormalizedChapters {
    type Item = &'a ChapterResult;
    type IntoIter = std::slice::Iter<'a, ChapterResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Progress record
// ---------------------------------------------------------------------------

/// Store-assigned record identifier. Sequential, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized record waiting for the store to assign id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgressRecord {
    pub owner: String,
    pub chapters: NormalizedChapters,
}

/// One immutable snapshot of a trainee's results across the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: RecordId,
    /// Email of the owning identity.
    pub owner: String,
    /// Submission timestamp (microseconds since epoch).
    pub created_at: u64,
    pub chapters: NormalizedChapters,
}

impl ProgressRecord {
    /// Attach store-assigned fields to a new record.
    pub fn from_new(new: NewProgressRecord, id: RecordId, created_at: u64) -> Self {
        Self {
            id,
            owner: new.owner,
            created_at,
            chapters: new.chapters,
        }
    }

    /// Newest-first ordering used by every listing.
    pub fn newest_first(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
    }
}
