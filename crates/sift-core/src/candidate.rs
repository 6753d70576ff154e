//! Candidates: the items served to annotators.
//!
//! Candidates are never physically removed. Deletion flips the `deleted`
//! flag, which removes the candidate from sampling for every annotator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item eligible for annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
  /// Ordered, store-assigned identifier. Sampling probes this range.
  pub candidate_id: i64,
  /// Identifier in the originating system (e.g. a post id), if any.
  pub external_id:  Option<String>,
  pub text:         String,
  /// The search term that surfaced this item during collection.
  pub search_term:  Option<String>,
  pub deleted:      bool,
  pub ingested_at:  DateTime<Utc>,
}

/// Input to [`crate::store::AnnotationStore::add_candidate`].
///
/// One JSON object per line in an import file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCandidate {
  pub text:        String,
  #[serde(default)]
  pub external_id: Option<String>,
  #[serde(default)]
  pub search_term: Option<String>,
}

impl NewCandidate {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into(), external_id: None, search_term: None }
  }
}

/// Closed bounds of the identifiers currently held by non-deleted
/// candidates. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
  pub min: i64,
  pub max: i64,
}
