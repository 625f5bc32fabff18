//! Stress test: token issue and validation from many threads, plus racing
//! registrations of one email.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use trainee_progress::{
    DirIdentityStore, Identity, IdentityStore, MemoryIdentityStore, MemoryProgressStore,
    PasswordCost, Role, SessionAuthority, TrackerConfig, TrackerError, TrackerService,
};

const KEY: &str = "stress-signing-key-0123456789abcdef!";

fn config() -> TrackerConfig {
    let mut config = TrackerConfig::with_signing_key(KEY);
    config.password_cost = PasswordCost::minimal();
    config
}

fn identity(i: usize) -> Identity {
    Identity {
        email: format!("trainee{i}@rig.com"),
        password_hash: String::new(),
        role: Role::Trainee,
        name: format!("Trainee {i}"),
        created_at: 0,
    }
}

#[test]
fn stress_parallel_token_validation() {
    let authority = Arc::new(SessionAuthority::new(&config()).unwrap());
    let threads = 8;
    let per_thread = 250;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let authority = Arc::clone(&authority);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let who = identity(t * per_thread + i);
                    let issued = authority.issue_token(&who, None).unwrap();
                    let subject = authority.validate_token(&issued.access_token).unwrap();
                    assert_eq!(subject, who.email, "thread {t} iteration {i}");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn stress_shared_token_validated_everywhere() {
    let authority = Arc::new(SessionAuthority::new(&config()).unwrap());
    let token = Arc::new(
        authority
            .issue_token(&identity(0), Some(Duration::from_secs(3600)))
            .unwrap()
            .access_token,
    );

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let authority = Arc::clone(&authority);
            let token = Arc::clone(&token);
            thread::spawn(move || {
                for _ in 0..500 {
                    assert_eq!(
                        authority.validate_token(&token).unwrap(),
                        "trainee0@rig.com"
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn stress_racing_registrations_memory_store() {
    let service = Arc::new(
        TrackerService::new(config(), MemoryIdentityStore::new(), MemoryProgressStore::new())
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service.register("same@rig.com", "password-123", Role::Trainee, &format!("T{t}"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one registration must win");
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, TrackerError::DuplicateEmail(_))));
}

#[test]
fn stress_racing_inserts_directory_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirIdentityStore::new(dir.path()).unwrap());

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut who = identity(0);
                who.created_at = t;
                store.insert(who)
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(winners, 1);
    assert_eq!(store.list(0, 100).unwrap().len(), 1);
}
