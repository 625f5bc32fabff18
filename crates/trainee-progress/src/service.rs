//! The tracker facade: every outward operation in one place.
//!
//! [`TrackerService`] wires the session authority, the stores, the
//! normalizer, the statistics engine, and a report renderer together. It
//! holds no mutable state of its own; all writes go through the stores.

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::identity::{normalize_email, validate_registration, Identity, Profile, Role};
use crate::mediator::{mediate, Decision};
use crate::progress::{
    normalize, remark_for, summarize, validate_submission, ChapterSubmission, NewProgressRecord,
    ProgressRecord, RecordId,
};
use crate::report::{report_file_name, Report, ReportRenderer, TextReportRenderer};
use crate::session::{authorize_admin, BearerToken, SessionAuthority};
use crate::storage::{IdentityStore, ProgressStore};

/// Tracker operations over an identity store `I`, a progress store `P`, and
/// a report renderer `R`.
pub struct TrackerService<I, P, R = TextReportRenderer> {
    config: TrackerConfig,
    authority: SessionAuthority,
    identities: I,
    progress: P,
    renderer: R,
}

impl<I, P> TrackerService<I, P, TextReportRenderer>
where
    I: IdentityStore,
    P: ProgressStore,
{
    /// Build a service that renders plain-text reports.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` if `config` does not validate.
    pub fn new(config: TrackerConfig, identities: I, progress: P) -> Result<Self> {
        Self::with_renderer(config, identities, progress, TextReportRenderer::default())
    }
}

impl<I, P, R> TrackerService<I, P, R>
where
    I: IdentityStore,
    P: ProgressStore,
    R: ReportRenderer,
{
    pub fn with_renderer(config: TrackerConfig, identities: I, progress: P, renderer: R) -> Result<Self> {
        let authority = SessionAuthority::new(&config)?;
        Ok(Self {
            config,
            authority,
            identities,
            progress,
            renderer,
        })
    }

    // ── Accounts ──────────────────────────────────────────────────────────────

    /// Register a new identity. The email's domain is stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad email, short password, or empty
    /// name, and `TrackerError::DuplicateEmail` if the email is taken.
    pub fn register(&self, email: &str, password: &str, role: Role, name: &str) -> Result<Identity> {
        validate_registration(email, password, name)?;
        let email = normalize_email(email);
        let email = email.as_str();

        // The store re-checks atomically on insert; this only avoids hashing
        // for an obvious duplicate.
        if self.identities.get_by_email(email)?.is_some() {
            return Err(TrackerError::DuplicateEmail(email.to_string()));
        }

        let identity = Identity {
            email: email.to_string(),
            password_hash: self.authority.hash_password(password)?,
            role,
            name: name.trim().to_string(),
            created_at: crate::time::now_micros(),
        };
        let stored = self.identities.insert(identity)?;
        log::info!("registered {} as {}", stored.email, stored.role);
        Ok(stored)
    }

    /// Exchange credentials for a bearer token.
    pub fn login(&self, email: &str, password: &str) -> Result<BearerToken> {
        let email = normalize_email(email);
        let identity = self.authority.authenticate(&self.identities, &email, password)?;
        let token = self.authority.issue_token(&identity, None)?;
        log::info!("issued token for {}", identity.email);
        Ok(token)
    }

    /// The profile of the identity a token names.
    pub fn whoami(&self, token: &str) -> Result<Profile> {
        Ok(self.authority.resolve(&self.identities, token)?.profile())
    }

    /// Page through all registered identities. Admin only.
    pub fn list_identities(&self, token: &str, skip: usize, limit: usize) -> Result<Vec<Profile>> {
        let requester = self.authority.resolve(&self.identities, token)?;
        self.require_admin(&requester, "list identities")?;
        Ok(self
            .identities
            .list(skip, limit)?
            .iter()
            .map(Identity::profile)
            .collect())
    }

    // ── Progress ──────────────────────────────────────────────────────────────

    /// Validate, normalize, and store a submission for `email`.
    ///
    /// Nothing is written unless every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad entries, unknown or repeated
    /// chapters, and `TrackerError::UnknownUser` if no identity has `email`.
    pub fn submit_progress(&self, email: &str, entries: &[ChapterSubmission]) -> Result<ProgressRecord> {
        let validated = validate_submission(entries, self.config.score_bounds)?;
        let chapters = normalize(validated, &self.config.curriculum)?;
        let email = normalize_email(email);
        let email = email.as_str();

        if self.identities.get_by_email(email)?.is_none() {
            log::warn!("submission for unknown user {email}");
            return Err(TrackerError::UnknownUser(email.to_string()));
        }

        let record = self.progress.insert(NewProgressRecord {
            owner: email.to_string(),
            chapters,
        })?;
        log::info!(
            "stored record {} for {} ({} chapter(s) submitted)",
            record.id,
            email,
            entries.len()
        );
        Ok(record)
    }

    /// Progress history of `target_email`, newest first.
    ///
    /// A trainee may read only their own history; an admin may read anyone's.
    pub fn fetch_progress(&self, token: &str, target_email: &str) -> Result<Vec<ProgressRecord>> {
        let requester = self.authority.resolve(&self.identities, token)?;
        let target_email = normalize_email(target_email);
        let target_email = target_email.as_str();
        let exists = self.identities.get_by_email(target_email)?.is_some();

        self.enforce(
            &requester,
            mediate(&requester, target_email, exists),
            "read another trainee's progress",
            || TrackerError::UnknownUser(target_email.to_string()),
        )?;
        self.progress.list_by_owner(target_email)
    }

    /// Every stored record, newest first. Admin only.
    pub fn list_all_progress(&self, token: &str) -> Result<Vec<ProgressRecord>> {
        let requester = self.authority.resolve(&self.identities, token)?;
        self.require_admin(&requester, "list all progress")?;
        self.progress.list_all()
    }

    /// Render the report for one record.
    pub fn fetch_report(&self, token: &str, id: RecordId) -> Result<Report> {
        let requester = self.authority.resolve(&self.identities, token)?;
        let record = self.progress.get_by_id(id)?;

        let decision = match &record {
            Some(r) => mediate(&requester, &r.owner, true),
            None => Decision::NotFound,
        };
        self.enforce(&requester, decision, "read another trainee's report", || {
            TrackerError::NotFound(format!("progress record {id}"))
        })?;

        let record = record.ok_or_else(|| TrackerError::NotFound(format!("progress record {id}")))?;
        let owner = self
            .identities
            .get_by_email(&record.owner)?
            .ok_or_else(|| TrackerError::UnknownUser(record.owner.clone()))?;

        let summary = summarize(&record.chapters);
        let remark = remark_for(&owner.name, &summary);
        let bytes = self.renderer.render(&owner, &record, &summary, &remark)?;

        log::info!("rendered report for record {} ({})", record.id, owner.email);
        Ok(Report {
            file_name: report_file_name(&owner.name, record.created_at, self.renderer.extension()),
            content_type: self.renderer.content_type().to_string(),
            bytes,
        })
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_admin(&self, requester: &Identity, action: &str) -> Result<()> {
        authorize_admin(requester).require(action).map_err(|e| {
            log::warn!("{} denied: {action}", requester.email);
            e
        })
    }

    /// Apply the disclosure policy to a mediated decision and turn it into a
    /// result.
    fn enforce(
        &self,
        requester: &Identity,
        decision: Decision,
        action: &str,
        not_found: impl FnOnce() -> TrackerError,
    ) -> Result<()> {
        match self.config.disclosure.disclose(requester, decision) {
            Decision::Allow => Ok(()),
            Decision::Forbidden => {
                log::warn!("{} denied: {action}", requester.email);
                Err(TrackerError::Forbidden(action.to_string()))
            }
            Decision::NotFound => Err(not_found()),
        }
    }
}
