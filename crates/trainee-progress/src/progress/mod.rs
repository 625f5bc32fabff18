//! Progress records: validation, normalization, and statistics.
//!
//! A submission arrives as a partial, unordered list of raw chapter results.
//! It flows through three stages, each a pure function:
//!
//! 1. [`validate_submission`] turns raw entries into typed [`ChapterResult`]s
//!    (score bounds, status names, non-empty submission).
//! 2. [`normalize`] checks chapter membership and uniqueness against the
//!    curriculum, fills in omitted chapters as not attempted, and orders the
//!    result by curriculum position.
//! 3. [`summarize`] and [`classify_remark`] derive report statistics from a
//!    stored record.

pub mod normalize;
pub mod stats;
pub mod types;
pub mod validate;

pub use normalize::normalize;
pub use stats::{classify_remark, remark_for, summarize, Remark, RemarkTier, Summary};
pub use types::{
    ChapterResult, ChapterStatus, ChapterSubmission, NewProgressRecord, NormalizedChapters,
    ProgressRecord, RawScore, RecordId, Score,
};
pub use validate::{validate_chapter, validate_submission};
