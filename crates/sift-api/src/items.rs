//! Handler for `GET /items/next`.
//!
//! The client keeps the returned candidate as its current item and sends its
//! `candidate_id` back with the judgment; nothing is remembered server-side.

use axum::{Json, extract::State};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use sift_core::{candidate::Candidate, store::AnnotationStore};

use crate::{ApiState, auth::Requester, error::ApiError};

#[derive(Debug, Serialize)]
pub struct NextItem {
  /// `null` when nothing unjudged was found within the retry budget.
  pub candidate: Option<Candidate>,
}

/// `GET /items/next`
pub async fn next<S>(
  State(state): State<ApiState<S>>,
  requester: Requester,
) -> Result<Json<NextItem>, ApiError>
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  let mut rng = StdRng::from_entropy();
  let candidate = state
    .sampler
    .sample(state.store.as_ref(), requester.annotator_id, &mut rng)
    .await
    .map_err(ApiError::from_store)?;

  if candidate.is_none() {
    tracing::info!(
      annotator_id = requester.annotator_id,
      "no unjudged item available"
    );
  }

  Ok(Json(NextItem { candidate }))
}
