//! Error types for `sift-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("candidate not found: {0}")]
  CandidateNotFound(i64),

  #[error("candidate {0} has been deleted")]
  CandidateDeleted(i64),

  #[error("candidate {candidate_id} already judged by annotator {annotator_id}")]
  AlreadyJudged { candidate_id: i64, annotator_id: i64 },

  #[error("annotator {0} already exists")]
  AnnotatorExists(i64),

  #[error("invalid label: {0}")]
  InvalidLabel(String),

  #[error("unknown {kind} value: {value:?}")]
  UnknownCategory { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
