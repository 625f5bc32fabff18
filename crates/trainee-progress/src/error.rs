//! Error types for trainee-progress.
//!
//! All errors are strongly typed and propagated without panicking.
//! Passwords, password hashes, and tokens are never included in messages.

/// Coarse category of a [`TrackerError`], for transports that map errors
/// onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    Internal,
}

/// Input that failed validation. Always surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Chapter must be one of the curriculum chapters, got '{0}'")]
    UnknownChapter(String),

    #[error("Chapter '{0}' was submitted more than once")]
    DuplicateChapter(String),

    #[error("Score must be an integer ({min}-{max}) or 'NA', got {got}")]
    ScoreOutOfRange { min: u8, max: u8, got: String },

    #[error("Status must be one of Completed, Pending, Not Completed, got '{0}'")]
    UnknownStatus(String),

    #[error("Role must be one of Trainee, Admin, got '{0}'")]
    UnknownRole(String),

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Trainee name is required")]
    EmptyName,

    #[error("At least one chapter must be provided")]
    EmptySubmission,
}

/// Tracker error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("could not validate credentials")]
    InvalidToken,

    #[error("not authorized: {0}")]
    Forbidden(String),

    #[error("user not found with email: {0}")]
    UnknownUser(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Report rendering failed: {0}")]
    RenderFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidCredentials | Self::InvalidToken => ErrorKind::Authentication,
            Self::Forbidden(_) => ErrorKind::Authorization,
            Self::UnknownUser(_) | Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateEmail(_) => ErrorKind::Conflict,
            Self::InvalidConfig(_)
            | Self::HashingFailed(_)
            | Self::RenderFailed(_)
            | Self::StorageError(_)
            | Self::SerializationError(_)
            | Self::InvalidFileFormat(_)
            | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, TrackerError>;
