//! Handlers for judgment writes and reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/judgments` | The requester's judgments, oldest first |
//! | `POST` | `/judgments` | Body: [`JudgmentBody`]; returns 201 + judgment |
//! | `POST` | `/candidates/{id}/delete` | Soft-delete; returns the `deleted` judgment |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use sift_core::{
  judgment::{Judgment, Label, LabelParts, NewJudgment},
  store::AnnotationStore,
};

use crate::{ApiState, auth::Requester, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /judgments`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  requester: Requester,
) -> Result<Json<Vec<Judgment>>, ApiError>
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  let judgments = state
    .store
    .list_judgments(requester.annotator_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(judgments))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /judgments`.
///
/// ```json
/// {"candidate_id": 17, "is_hate_speech": true,
///  "main_category": "online_hate_speech", "sub_category": "general_hate"}
/// ```
#[derive(Debug, Deserialize)]
pub struct JudgmentBody {
  pub candidate_id: i64,
  #[serde(flatten)]
  pub label:        LabelParts,
}

/// `POST /judgments`: returns 201 and the stored [`Judgment`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  requester: Requester,
  Json(body): Json<JudgmentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  let label = Label::from_parts(body.label)?;
  let judgment = state
    .store
    .record_judgment(NewJudgment {
      candidate_id: body.candidate_id,
      annotator_id: requester.annotator_id,
      label,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    annotator_id = judgment.annotator_id,
    candidate_id = judgment.candidate_id,
    status = ?judgment.status,
    "judgment recorded"
  );
  Ok((StatusCode::CREATED, Json(judgment)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /candidates/{id}/delete`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  requester: Requester,
  Path(candidate_id): Path<i64>,
) -> Result<Json<Judgment>, ApiError>
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  let judgment = state
    .store
    .delete_candidate(requester.annotator_id, candidate_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(judgment))
}
