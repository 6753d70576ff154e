//! Integration tests for `SqliteStore` against an in-memory database.

use rand::{SeedableRng, rngs::StdRng};
use sift_core::{
  candidate::NewCandidate,
  judgment::{HateCategory, JudgmentStatus, Label, NewJudgment, Sentiment, SubCategory},
  sampler::{CandidateSource, Sampler},
  store::AnnotationStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn store_with(n: usize) -> SqliteStore {
  let s = store().await;
  for i in 1..=n {
    s.add_candidate(NewCandidate::new(format!("post {i}")))
      .await
      .unwrap();
  }
  s
}

fn benign(candidate_id: i64, annotator_id: i64) -> NewJudgment {
  NewJudgment {
    candidate_id,
    annotator_id,
    label: Label::Benign { sentiment: Sentiment::Neutral },
  }
}

// ─── Candidates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_candidate() {
  let s = store().await;

  let mut input = NewCandidate::new("hello world");
  input.external_id = Some("1790000000000000001".into());
  input.search_term = Some("greeting".into());
  let added = s.add_candidate(input).await.unwrap();
  assert!(!added.deleted);

  let fetched = s.get_candidate(added.candidate_id).await.unwrap().unwrap();
  assert_eq!(fetched.text, "hello world");
  assert_eq!(fetched.external_id.as_deref(), Some("1790000000000000001"));
  assert_eq!(fetched.search_term.as_deref(), Some("greeting"));
}

#[tokio::test]
async fn candidate_ids_increase() {
  let s = store().await;
  let a = s.add_candidate(NewCandidate::new("a")).await.unwrap();
  let b = s.add_candidate(NewCandidate::new("b")).await.unwrap();
  assert!(b.candidate_id > a.candidate_id);
}

#[tokio::test]
async fn get_candidate_missing_returns_none() {
  let s = store().await;
  assert!(s.get_candidate(42).await.unwrap().is_none());
}

// ─── Range and probe ─────────────────────────────────────────────────────────

#[tokio::test]
async fn id_range_empty_store() {
  let s = store().await;
  assert!(s.id_range().await.unwrap().is_none());
}

#[tokio::test]
async fn id_range_ignores_deleted_candidates() {
  let s = store_with(5).await;
  s.delete_candidate(1, 1).await.unwrap();
  s.delete_candidate(1, 5).await.unwrap();

  let range = s.id_range().await.unwrap().unwrap();
  assert_eq!((range.min, range.max), (2, 4));
}

#[tokio::test]
async fn probe_skips_judged_and_deleted() {
  let s = store_with(6).await;
  s.record_judgment(benign(2, 9)).await.unwrap();
  s.delete_candidate(1, 3).await.unwrap();

  let found = s.first_unjudged_from(9, 2).await.unwrap().unwrap();
  assert_eq!(found.candidate_id, 4);

  // Another annotator still sees 2.
  let found = s.first_unjudged_from(8, 2).await.unwrap().unwrap();
  assert_eq!(found.candidate_id, 2);

  assert!(s.first_unjudged_from(9, 7).await.unwrap().is_none());
}

// ─── Sampling ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sample_finds_the_last_unjudged_candidate() {
  let s = store_with(1000).await;
  for id in 1..=999 {
    s.record_judgment(benign(id, 1)).await.unwrap();
  }

  let mut rng = StdRng::seed_from_u64(2024);
  let got = Sampler::default().sample(&s, 1, &mut rng).await.unwrap();
  assert_eq!(got.map(|c| c.candidate_id), Some(1000));
}

#[tokio::test]
async fn sample_returns_none_when_everything_is_judged() {
  let s = store_with(20).await;
  for id in 1..=20 {
    s.record_judgment(benign(id, 1)).await.unwrap();
  }

  let mut rng = StdRng::seed_from_u64(7);
  let got = Sampler::default().sample(&s, 1, &mut rng).await.unwrap();
  assert!(got.is_none());
}

#[tokio::test]
async fn sample_never_returns_excluded_candidates() {
  let s = store_with(60).await;
  for id in (1..=60).filter(|id| id % 4 == 0) {
    s.delete_candidate(2, id).await.unwrap();
  }
  for id in (1..=60).filter(|id| id % 3 == 0) {
    // Deleted candidates reject new judgments; skip those.
    if id % 4 != 0 {
      s.record_judgment(benign(id, 1)).await.unwrap();
    }
  }

  let sampler = Sampler::default();
  let mut rng = StdRng::seed_from_u64(99);
  for _ in 0..100 {
    if let Some(c) = sampler.sample(&s, 1, &mut rng).await.unwrap() {
      assert!(c.candidate_id % 4 != 0, "deleted {}", c.candidate_id);
      assert!(c.candidate_id % 3 != 0, "judged {}", c.candidate_id);
    }
  }
}

// ─── Judgments ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_judgment_and_list() {
  let s = store_with(2).await;
  let label = Label::Hate {
    category: HateCategory::OnlineHateSpeech(SubCategory::IncitementToViolence),
  };

  let j = s
    .record_judgment(NewJudgment { candidate_id: 1, annotator_id: 5, label })
    .await
    .unwrap();
  assert_eq!(j.status, JudgmentStatus::Classified);

  s.record_judgment(NewJudgment {
    candidate_id: 2,
    annotator_id: 5,
    label: Label::NotClassifiable,
  })
  .await
  .unwrap();

  let all = s.list_judgments(5).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].judgment_id, j.judgment_id);
  assert_eq!(all[0].label, label);
  assert_eq!(all[1].label, Label::NotClassifiable);
  assert_eq!(all[1].status, JudgmentStatus::NotClassifiable);

  assert_eq!(s.count_judgments(5).await.unwrap(), 2);
  assert_eq!(s.count_judgments(6).await.unwrap(), 0);
}

#[tokio::test]
async fn record_judgment_twice_errors() {
  let s = store_with(1).await;
  s.record_judgment(benign(1, 1)).await.unwrap();

  let err = s.record_judgment(benign(1, 1)).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(sift_core::Error::AlreadyJudged { candidate_id: 1, annotator_id: 1 })
  ));

  // A different annotator may judge the same candidate.
  s.record_judgment(benign(1, 2)).await.unwrap();
}

#[tokio::test]
async fn record_judgment_unknown_candidate_errors() {
  let s = store().await;
  let err = s.record_judgment(benign(3, 1)).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(sift_core::Error::CandidateNotFound(3))
  ));
}

#[tokio::test]
async fn record_judgment_on_deleted_candidate_errors() {
  let s = store_with(1).await;
  s.delete_candidate(1, 1).await.unwrap();

  let err = s.record_judgment(benign(1, 2)).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(sift_core::Error::CandidateDeleted(1))
  ));
}

#[tokio::test]
async fn record_judgment_rejects_deleted_label() {
  let s = store_with(1).await;
  let err = s
    .record_judgment(NewJudgment {
      candidate_id: 1,
      annotator_id: 1,
      label:        Label::Deleted,
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(sift_core::Error::InvalidLabel(_))
  ));
  assert!(s.list_judgments(1).await.unwrap().is_empty());
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_sets_flag_and_records_judgment() {
  let s = store_with(1).await;

  let j = s.delete_candidate(4, 1).await.unwrap();
  assert_eq!(j.label, Label::Deleted);
  assert_eq!(j.status, JudgmentStatus::Deleted);

  let c = s.get_candidate(1).await.unwrap().unwrap();
  assert!(c.deleted);

  let listed = s.list_judgments(4).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].label, Label::Deleted);
  let parts = listed[0].label.parts();
  assert!(!parts.is_hate_speech);
  assert!(parts.sentiment.is_none());
}

#[tokio::test]
async fn delete_is_idempotent() {
  let s = store_with(1).await;
  s.delete_candidate(1, 1).await.unwrap();
  s.delete_candidate(2, 1).await.unwrap();

  assert!(s.get_candidate(1).await.unwrap().unwrap().deleted);
  assert!(s.id_range().await.unwrap().is_none());
}

#[tokio::test]
async fn delete_after_judging_is_allowed() {
  let s = store_with(1).await;
  s.record_judgment(benign(1, 1)).await.unwrap();
  s.delete_candidate(1, 1).await.unwrap();
  assert_eq!(s.count_judgments(1).await.unwrap(), 2);
}

#[tokio::test]
async fn delete_unknown_candidate_errors() {
  let s = store().await;
  let err = s.delete_candidate(1, 77).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(sift_core::Error::CandidateNotFound(77))
  ));
}

#[tokio::test]
async fn persisted_judgments_never_carry_sub_category_and_sentiment() {
  let s = store_with(4).await;
  let labels = [
    Label::Hate { category: HateCategory::Cyberbullying },
    Label::Hate {
      category: HateCategory::OnlineHateSpeech(SubCategory::GenderDiscrimination),
    },
    Label::Benign { sentiment: Sentiment::Positive },
    Label::NotClassifiable,
  ];
  for (i, label) in labels.into_iter().enumerate() {
    s.record_judgment(NewJudgment {
      candidate_id: i as i64 + 1,
      annotator_id: 1,
      label,
    })
    .await
    .unwrap();
  }
  s.delete_candidate(1, 4).await.unwrap();

  for j in s.list_judgments(1).await.unwrap() {
    let p = j.label.parts();
    assert!(p.sub_category.is_none() || p.sentiment.is_none(), "{j:?}");
  }
}

// ─── Annotators ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_annotator_and_read_credential() {
  let s = store().await;
  let a = s.add_annotator(3, "$argon2id$fake".into()).await.unwrap();
  assert_eq!(a.annotator_id, 3);

  let hash = s.annotator_credential(3).await.unwrap();
  assert_eq!(hash.as_deref(), Some("$argon2id$fake"));
  assert!(s.annotator_credential(4).await.unwrap().is_none());
}

#[tokio::test]
async fn add_annotator_twice_errors() {
  let s = store().await;
  s.add_annotator(3, "a".into()).await.unwrap();
  let err = s.add_annotator(3, "b".into()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(sift_core::Error::AnnotatorExists(3))
  ));
  assert_eq!(s.annotator_credential(3).await.unwrap().as_deref(), Some("a"));
}
