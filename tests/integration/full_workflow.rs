//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle against the directory-backed stores:
//! 1. Register a trainee and an admin
//! 2. Log in and resolve tokens
//! 3. Submit partial results and read back normalized records
//! 4. Enforce trainee/admin read boundaries
//! 5. Render reports with statistics and remarks

use trainee_progress::{
    ChapterStatus, ChapterSubmission, DirIdentityStore, DirProgressStore, DisclosurePolicy,
    PasswordCost, RecordId, Role, Score, TokenAlgorithm, TrackerConfig, TrackerError,
    TrackerService, DEFAULT_CHAPTERS,
};

const KEY: &str = "integration-signing-key-0123456789abcdef";

fn config() -> TrackerConfig {
    let mut config = TrackerConfig::with_signing_key(KEY);
    config.password_cost = PasswordCost::minimal();
    config
}

fn dir_service(
    root: &std::path::Path,
    config: TrackerConfig,
) -> TrackerService<DirIdentityStore, DirProgressStore> {
    TrackerService::new(
        config,
        DirIdentityStore::new(root.join("identities")).unwrap(),
        DirProgressStore::new(root.join("progress")).unwrap(),
    )
    .unwrap()
}

#[test]
fn full_workflow_register_to_report() {
    let dir = tempfile::tempdir().unwrap();
    let svc = dir_service(dir.path(), config());

    // ── Step 1: Register ────────────────────────────────────────────────
    let tess = svc
        .register("tess@rig.com", "drill-password", Role::Trainee, "Tess Ng")
        .unwrap();
    assert!(tess.password_hash.starts_with("$argon2id$"));
    svc.register("ops@rig.com", "admin-password", Role::Admin, "Ops Lead")
        .unwrap();

    // ── Step 2: Log in ──────────────────────────────────────────────────
    let tess_token = svc.login("tess@rig.com", "drill-password").unwrap();
    assert_eq!(tess_token.token_type, "bearer");
    let admin_token = svc.login("ops@rig.com", "admin-password").unwrap().access_token;
    let tess_token = tess_token.access_token;
    assert_eq!(svc.whoami(&tess_token).unwrap().name, "Tess Ng");

    // ── Step 3: Submit ──────────────────────────────────────────────────
    let first = svc
        .submit_progress(
            "tess@rig.com",
            &[ChapterSubmission::new("Briefing Room", 9, "Completed")],
        )
        .unwrap();
    assert_eq!(first.id, RecordId(1));

    let chapters = first.chapters.as_slice();
    assert_eq!(chapters.len(), DEFAULT_CHAPTERS.len());
    assert_eq!(chapters[0].chapter.as_str(), "Briefing Room");
    assert_eq!(chapters[0].score, Score::Points(9));
    assert_eq!(chapters[0].status, ChapterStatus::Completed);
    for (entry, name) in chapters[1..].iter().zip(&DEFAULT_CHAPTERS[1..]) {
        assert_eq!(entry.chapter.as_str(), *name);
        assert_eq!(entry.score, Score::NotAttempted);
        assert_eq!(entry.status, ChapterStatus::NotCompleted);
    }

    let scores = [9, 8, 7, 6, 8, 9, 10];
    let full: Vec<ChapterSubmission> = DEFAULT_CHAPTERS
        .iter()
        .rev()
        .zip(scores.iter().rev())
        .map(|(c, s)| ChapterSubmission::new(*c, i64::from(*s), "Completed"))
        .collect();
    let second = svc.submit_progress("tess@rig.com", &full).unwrap();
    assert_eq!(second.id, RecordId(2));
    let stored: Vec<Option<u8>> = second.chapters.iter().map(|c| c.score.points()).collect();
    assert_eq!(stored, scores.iter().map(|s| Some(*s)).collect::<Vec<_>>());

    // ── Step 4: Read boundaries ─────────────────────────────────────────
    let history = svc.fetch_progress(&tess_token, "tess@rig.com").unwrap();
    let ids: Vec<RecordId> = history.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![RecordId(2), RecordId(1)]);

    assert!(matches!(
        svc.fetch_progress(&tess_token, "ops@rig.com"),
        Err(TrackerError::Forbidden(_))
    ));
    assert_eq!(svc.list_all_progress(&admin_token).unwrap().len(), 2);
    assert_eq!(svc.list_identities(&admin_token, 0, 10).unwrap().len(), 2);

    // ── Step 5: Reports ─────────────────────────────────────────────────
    let report = svc.fetch_report(&tess_token, RecordId(2)).unwrap();
    let text = String::from_utf8(report.bytes).unwrap();
    assert!(text.contains("OVERALL PASS RATE OF 100.0%"));
    assert!(text.contains("Average score: 8.1"));

    let report = svc.fetch_report(&admin_token, RecordId(1)).unwrap();
    let text = String::from_utf8(report.bytes).unwrap();
    assert!(text.contains("TESS NG HAS COMPLETED 1 OUT OF 7 CHAPTERS"));
    assert!(report.file_name.starts_with("Report_Tess_Ng_"));
}

#[test]
fn records_survive_reopening_the_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    {
        let svc = dir_service(dir.path(), config());
        svc.register("tess@rig.com", "drill-password", Role::Trainee, "Tess Ng")
            .unwrap();
        svc.submit_progress(
            "tess@rig.com",
            &[ChapterSubmission::new("Debrief", "NA", "Pending")],
        )
        .unwrap();
    }

    let svc = dir_service(dir.path(), config());
    let token = svc.login("tess@rig.com", "drill-password").unwrap().access_token;
    let history = svc.fetch_progress(&token, "tess@rig.com").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].chapters.as_slice()[6].status, ChapterStatus::Pending);
}

#[test]
fn tokens_do_not_cross_keys_or_algorithms() {
    let dir = tempfile::tempdir().unwrap();
    let svc = dir_service(dir.path(), config());
    svc.register("tess@rig.com", "drill-password", Role::Trainee, "Tess Ng")
        .unwrap();
    let token = svc.login("tess@rig.com", "drill-password").unwrap().access_token;

    let mut other_alg = config();
    other_alg.token_algorithm = TokenAlgorithm::Hs512;
    let svc_512 = dir_service(dir.path(), other_alg);
    assert!(matches!(svc_512.whoami(&token), Err(TrackerError::InvalidToken)));

    let mut other_key = config();
    other_key.signing_key = trainee_progress::SigningKey::new("a-completely-different-key-of-32+-bytes");
    let svc_other = dir_service(dir.path(), other_key);
    assert!(matches!(svc_other.whoami(&token), Err(TrackerError::InvalidToken)));
}

#[test]
fn disclosure_policy_controls_missing_record_errors() {
    let dir = tempfile::tempdir().unwrap();

    let concealed = dir_service(dir.path(), config());
    concealed
        .register("tess@rig.com", "drill-password", Role::Trainee, "Tess Ng")
        .unwrap();
    let token = concealed.login("tess@rig.com", "drill-password").unwrap().access_token;
    assert!(matches!(
        concealed.fetch_report(&token, RecordId(42)),
        Err(TrackerError::Forbidden(_))
    ));

    let mut reveal = config();
    reveal.disclosure = DisclosurePolicy::Reveal;
    let revealed = dir_service(dir.path(), reveal);
    assert!(matches!(
        revealed.fetch_report(&token, RecordId(42)),
        Err(TrackerError::NotFound(_))
    ));
}

#[test]
fn validation_errors_are_reported_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let svc = dir_service(dir.path(), config());
    svc.register("tess@rig.com", "drill-password", Role::Trainee, "Tess Ng")
        .unwrap();

    let cases = [
        (
            ChapterSubmission::new("Helideck", 5, "Completed"),
            "Chapter must be one of the curriculum chapters, got 'Helideck'",
        ),
        (
            ChapterSubmission::new("Debrief", 11, "Completed"),
            "Score must be an integer (0-10) or 'NA', got 11",
        ),
        (
            ChapterSubmission::new("Debrief", 5, "Finished"),
            "Status must be one of Completed, Pending, Not Completed, got 'Finished'",
        ),
    ];
    for (entry, message) in cases {
        let err = svc.submit_progress("tess@rig.com", &[entry]).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    let err = svc.submit_progress("tess@rig.com", &[]).unwrap_err();
    assert_eq!(err.to_string(), "At least one chapter must be provided");
}
