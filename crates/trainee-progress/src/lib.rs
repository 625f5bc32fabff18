//! trainee-progress: training progress tracking for simulation courses.
//!
//! Trainees and admins register with an email and password, log in for a
//! stateless bearer token, and read progress records their role allows.
//! The simulation submits partial, unordered chapter results; every stored
//! record covers the whole curriculum in curriculum order, and reports
//! summarize a record with statistics and a closing remark.
//!
//! The entry point is [`TrackerService`], built from a validated
//! [`TrackerConfig`] and a pair of stores.

pub mod config;
pub mod crypto;
pub mod curriculum;
pub mod error;
pub mod identity;
pub mod mediator;
pub mod progress;
pub mod report;
pub mod service;
pub mod session;
pub mod storage;
pub mod time;

// Re-export primary types
pub use config::{PasswordCost, ScoreBounds, SigningKey, TokenAlgorithm, TrackerConfig};
pub use curriculum::{ChapterId, Curriculum, DEFAULT_CHAPTERS};
pub use error::{ErrorKind, Result, TrackerError, ValidationError};
pub use identity::{Identity, Profile, Role};
pub use mediator::{mediate, Decision, DisclosurePolicy};
pub use service::TrackerService;

// Re-export progress types
pub use progress::{
    classify_remark, normalize, remark_for, summarize, validate_chapter, validate_submission,
    ChapterResult, ChapterStatus, ChapterSubmission, NewProgressRecord, NormalizedChapters,
    ProgressRecord, RawScore, RecordId, Remark, RemarkTier, Score, Summary,
};

// Re-export session types
pub use session::{authorize_admin, authorize_self_or_admin, Access, BearerToken, Claims, SessionAuthority};

// Re-export storage and report types
pub use report::{Report, ReportRenderer, TextReportRenderer};
pub use storage::{
    DirIdentityStore, DirProgressStore, IdentityStore, MemoryIdentityStore, MemoryProgressStore,
    ProgressStore,
};
