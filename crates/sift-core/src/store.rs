//! The `AnnotationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `sift-store-sqlite`).
//! Higher layers (`sift-api`, `sift-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  annotator::Annotator,
  candidate::{Candidate, NewCandidate},
  judgment::{Judgment, NewJudgment},
  sampler::CandidateSource,
};

/// Backend errors that may wrap a domain [`crate::Error`].
///
/// Lets transport layers tell "candidate not found" apart from "database
/// unavailable" without knowing the backend's error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error carried by this backend error, if any.
  fn as_core(&self) -> Option<&crate::Error>;
}

impl StoreError for crate::Error {
  fn as_core(&self) -> Option<&crate::Error> { Some(self) }
}

/// Abstraction over a sift store backend.
///
/// Judgments are append-only. The only mutation ever applied to existing
/// data is the candidate soft-delete flag.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AnnotationStore: CandidateSource + Send + Sync {
  // ── Candidates ────────────────────────────────────────────────────────

  /// Persist a new candidate. The identifier is assigned by the store and is
  /// greater than every identifier assigned before it.
  fn add_candidate(
    &self,
    input: NewCandidate,
  ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send + '_;

  /// Retrieve a candidate (deleted or not). Returns `None` if not found.
  fn get_candidate(
    &self,
    candidate_id: i64,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + '_;

  /// Soft-delete a candidate and record a `deleted` judgment by
  /// `annotator_id`, atomically. Deleting an already-deleted candidate is
  /// not an error; the flag stays set and another judgment is recorded.
  fn delete_candidate(
    &self,
    annotator_id: i64,
    candidate_id: i64,
  ) -> impl Future<Output = Result<Judgment, Self::Error>> + Send + '_;

  // ── Judgments ─────────────────────────────────────────────────────────

  /// Record a judgment. The `recorded_at` timestamp is set by the store.
  ///
  /// Fails with [`crate::Error::CandidateNotFound`],
  /// [`crate::Error::CandidateDeleted`], [`crate::Error::AlreadyJudged`], or
  /// [`crate::Error::InvalidLabel`] for a `Deleted` label.
  fn record_judgment(
    &self,
    input: NewJudgment,
  ) -> impl Future<Output = Result<Judgment, Self::Error>> + Send + '_;

  /// All judgments recorded by an annotator, oldest first.
  fn list_judgments(
    &self,
    annotator_id: i64,
  ) -> impl Future<Output = Result<Vec<Judgment>, Self::Error>> + Send + '_;

  /// Number of judgments recorded by an annotator.
  fn count_judgments(
    &self,
    annotator_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Annotators ────────────────────────────────────────────────────────

  /// Register an annotator with an argon2 PHC password hash.
  fn add_annotator(
    &self,
    annotator_id: i64,
    password_hash: String,
  ) -> impl Future<Output = Result<Annotator, Self::Error>> + Send + '_;

  /// The stored PHC hash for an annotator, or `None` if unknown.
  fn annotator_credential(
    &self,
    annotator_id: i64,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;
}
