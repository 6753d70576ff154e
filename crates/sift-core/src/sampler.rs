//! Unlabeled-item sampling.
//!
//! Picking a uniformly random unjudged row with `ORDER BY random()` scans the
//! whole candidate set. Instead the sampler draws a random identifier inside
//! the live identifier range and takes the nearest eligible candidate at or
//! after it, which needs only an indexed range scan. Candidates that follow a
//! long run of judged or deleted rows are slightly over-represented.
//!
//! Each attempt is a fresh probe. When every probe misses the sampler gives
//! up and reports nothing available, even if eligible candidates remain
//! before the probe points. Callers treat that the same as an exhausted set.

use std::future::Future;

use rand::Rng;

use crate::{
  candidate::{Candidate, IdRange},
  store::StoreError,
};

/// Default number of probes per [`Sampler::sample`] call.
pub const DEFAULT_RETRY_BUDGET: u32 = 8;

/// The two queries the sampler needs from a backend.
pub trait CandidateSource: Send + Sync {
  type Error: StoreError;

  /// Smallest and largest identifier among non-deleted candidates, or `None`
  /// when there are none.
  fn id_range(
    &self,
  ) -> impl Future<Output = Result<Option<IdRange>, Self::Error>> + Send + '_;

  /// The non-deleted candidate with the smallest identifier `>= from` that
  /// has no non-deleted judgment by `annotator_id`.
  fn first_unjudged_from(
    &self,
    annotator_id: i64,
    from: i64,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + '_;
}

/// Random-probe sampler with a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
  retry_budget: u32,
}

impl Default for Sampler {
  fn default() -> Self { Self::new(DEFAULT_RETRY_BUDGET) }
}

impl Sampler {
  /// A budget of zero is raised to one.
  pub fn new(retry_budget: u32) -> Self {
    Self { retry_budget: retry_budget.max(1) }
  }

  pub fn retry_budget(&self) -> u32 { self.retry_budget }

  /// Return one candidate that `annotator_id` has not judged and that is not
  /// deleted, or `None` if none was found within the retry budget.
  ///
  /// Read-only. The range and the probes are separate queries; concurrent
  /// writes between them can only cost a probe, never admit an ineligible
  /// candidate.
  pub async fn sample<S, R>(
    &self,
    source: &S,
    annotator_id: i64,
    rng: &mut R,
  ) -> Result<Option<Candidate>, S::Error>
  where
    S: CandidateSource,
    R: Rng + Send,
  {
    let Some(range) = source.id_range().await? else {
      tracing::debug!(annotator_id, "no live candidates");
      return Ok(None);
    };

    for attempt in 1..=self.retry_budget {
      let probe = rng.gen_range(range.min..=range.max);
      if let Some(candidate) = source.first_unjudged_from(annotator_id, probe).await? {
        tracing::debug!(
          annotator_id,
          attempt,
          probe,
          candidate_id = candidate.candidate_id,
          "sampled candidate"
        );
        return Ok(Some(candidate));
      }
      tracing::debug!(annotator_id, attempt, probe, "probe missed");
    }

    tracing::debug!(
      annotator_id,
      budget = self.retry_budget,
      "retry budget exhausted"
    );
    Ok(None)
  }
}
