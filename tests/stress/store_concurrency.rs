//! Stress test: concurrent submissions must never share a record id, and
//! listings stay newest-first at volume.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use trainee_progress::{
    normalize, ChapterResult, ChapterStatus, Curriculum, DirProgressStore, MemoryProgressStore,
    NewProgressRecord, ProgressRecord, ProgressStore, Score,
};

fn new_record(owner: &str, score: u8) -> NewProgressRecord {
    let submitted = vec![ChapterResult::new(
        "Debrief",
        Score::Points(score % 11),
        ChapterStatus::Completed,
    )];
    NewProgressRecord {
        owner: owner.to_string(),
        chapters: normalize(submitted, &Curriculum::default()).unwrap(),
    }
}

fn hammer<S: ProgressStore + 'static>(store: Arc<S>, threads: usize, per_thread: usize) -> Vec<ProgressRecord> {
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| {
                        store
                            .insert(new_record(&format!("t{t}@rig.com"), i as u8))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect()
}

fn assert_unique_sequential(records: &[ProgressRecord]) {
    let ids: HashSet<u64> = records.iter().map(|r| r.id.0).collect();
    assert_eq!(ids.len(), records.len(), "record ids must be unique");
    let max = ids.iter().copied().max().unwrap_or(0);
    assert_eq!(max as usize, records.len(), "ids must be 1..=n with no gaps");
}

#[test]
fn stress_memory_store_parallel_inserts() {
    let store = Arc::new(MemoryProgressStore::new());
    let records = hammer(Arc::clone(&store), 8, 200);
    assert_eq!(records.len(), 1600);
    assert_unique_sequential(&records);
    assert_eq!(store.list_all().unwrap().len(), 1600);
}

#[test]
fn stress_directory_store_parallel_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirProgressStore::new(dir.path()).unwrap());
    let records = hammer(Arc::clone(&store), 4, 20);
    assert_eq!(records.len(), 80);
    assert_unique_sequential(&records);
}

#[test]
fn stress_listings_newest_first() {
    let store = MemoryProgressStore::new();
    for i in 0..500u32 {
        let owner = if i % 2 == 0 { "even@rig.com" } else { "odd@rig.com" };
        store.insert(new_record(owner, (i % 11) as u8)).unwrap();
    }

    for listing in [
        store.list_all().unwrap(),
        store.list_by_owner("even@rig.com").unwrap(),
    ] {
        assert!(listing.windows(2).all(|w| {
            (w[0].created_at, w[0].id) >= (w[1].created_at, w[1].id)
        }));
    }
    assert_eq!(store.list_by_owner("odd@rig.com").unwrap().len(), 250);
}
