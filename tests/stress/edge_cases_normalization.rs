//! Edge case tests: normalization over every subset of the curriculum, in
//! several submission orders, plus summary and remark boundaries.

use trainee_progress::{
    classify_remark, normalize, summarize, validate_submission, ChapterResult, ChapterStatus,
    ChapterSubmission, Curriculum, RemarkTier, Score, ScoreBounds, ValidationError,
};

fn subset(curriculum: &Curriculum, mask: u32) -> Vec<ChapterResult> {
    curriculum
        .chapters()
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(i, c)| ChapterResult::new(c.clone(), Score::Points(i as u8), ChapterStatus::Completed))
        .collect()
}

#[test]
fn every_subset_normalizes_in_every_order() {
    let curriculum = Curriculum::default();
    let n = curriculum.len() as u32;

    for mask in 0..(1u32 << n) {
        let submitted = subset(&curriculum, mask);

        let mut orders = vec![submitted.clone()];
        let mut reversed = submitted.clone();
        reversed.reverse();
        orders.push(reversed);
        if !submitted.is_empty() {
            let mut rotated = submitted.clone();
            rotated.rotate_left(submitted.len() / 2);
            orders.push(rotated);
        }

        for order in orders {
            let out = normalize(order, &curriculum).unwrap();
            assert_eq!(out.len(), curriculum.len(), "mask {mask:07b}");

            for (pos, (entry, chapter)) in out.iter().zip(curriculum.chapters()).enumerate() {
                assert_eq!(&entry.chapter, chapter, "mask {mask:07b} position {pos}");
                if mask & (1 << pos) != 0 {
                    assert_eq!(entry.score, Score::Points(pos as u8));
                    assert_eq!(entry.status, ChapterStatus::Completed);
                } else {
                    assert_eq!(entry.score, Score::NotAttempted);
                    assert_eq!(entry.status, ChapterStatus::NotCompleted);
                }
            }

            let summary = summarize(&out);
            assert_eq!(summary.completed_count, mask.count_ones() as usize);
            let expected = match mask.count_ones() {
                0 => RemarkTier::NotStarted,
                c if c == n => RemarkTier::FullCompletion,
                _ => RemarkTier::Partial,
            };
            assert_eq!(classify_remark(&summary), expected, "mask {mask:07b}");
        }
    }
}

#[test]
fn duplicate_anywhere_is_rejected() {
    let curriculum = Curriculum::default();
    let full = subset(&curriculum, 0b111_1111);

    for i in 0..full.len() {
        let mut with_dup = full.clone();
        with_dup.push(full[i].clone());
        assert_eq!(
            normalize(with_dup, &curriculum),
            Err(ValidationError::DuplicateChapter(full[i].chapter.to_string()))
        );
    }
}

#[test]
fn chapter_names_are_case_sensitive() {
    let curriculum = Curriculum::default();
    let entry = ChapterResult::new("briefing room", Score::Points(3), ChapterStatus::Completed);
    assert!(matches!(
        normalize(vec![entry], &curriculum),
        Err(ValidationError::UnknownChapter(_))
    ));
}

#[test]
fn score_boundaries() {
    let bounds = ScoreBounds::default();
    let at = |score: i64| validate_submission(&[ChapterSubmission::new("Debrief", score, "Completed")], bounds);

    assert!(at(0).is_ok());
    assert!(at(10).is_ok());
    assert!(at(-1).is_err());
    assert!(at(11).is_err());
    assert!(at(i64::MAX).is_err());
    assert!(at(i64::MIN).is_err());
}

#[test]
fn sentinel_must_be_exact() {
    let bounds = ScoreBounds::default();
    for text in ["na", "N/A", " NA", "NA ", "", "9"] {
        let result = validate_submission(&[ChapterSubmission::new("Debrief", text, "Completed")], bounds);
        assert!(
            matches!(result, Err(ValidationError::ScoreOutOfRange { .. })),
            "{text:?} should be rejected"
        );
    }
}

#[test]
fn status_must_be_exact() {
    let bounds = ScoreBounds::default();
    for status in ["completed", "NotCompleted", "Not  Completed", "Done", ""] {
        let result = validate_submission(&[ChapterSubmission::new("Debrief", 1, status)], bounds);
        assert!(
            matches!(result, Err(ValidationError::UnknownStatus(_))),
            "{status:?} should be rejected"
        );
    }
}

#[test]
fn average_ties_round_to_even() {
    let curriculum = Curriculum::default();
    // 1 + 2 + 3 + 3 = 9 / 4 = 2.25; 0 + 1 + 1 + 1 = 3 / 4 = 0.75;
    // 9 + 8 = 8.5 exactly; 1 + 2 + 2 = 5 / 3 = 1.666..
    let cases: [(&[u8], f64); 5] = [
        (&[1, 2, 3, 3], 2.2),
        (&[0, 1, 1, 1], 0.8),
        (&[9, 8], 8.5),
        (&[1, 2, 2], 1.7),
        (&[0, 0, 1], 0.3),
    ];
    for (scores, expected) in cases {
        let submitted = curriculum
            .chapters()
            .iter()
            .zip(scores.iter())
            .map(|(c, s)| ChapterResult::new(c.clone(), Score::Points(*s), ChapterStatus::Pending))
            .collect();
        let summary = summarize(&normalize(submitted, &curriculum).unwrap());
        assert_eq!(summary.average_score, expected, "{scores:?}");
        assert_eq!(summary.completion_rate, 0.0);
    }
}
