//! Handler for `GET /progress`.

use axum::{Json, extract::State};
use serde::Serialize;
use sift_core::store::AnnotationStore;

use crate::{ApiState, auth::Requester, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Progress {
  pub annotator_id: i64,
  /// Judgments recorded so far, of any status.
  pub judged:       u64,
}

/// `GET /progress`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  requester: Requester,
) -> Result<Json<Progress>, ApiError>
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  let judged = state
    .store
    .count_judgments(requester.annotator_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Progress { annotator_id: requester.annotator_id, judged }))
}
