//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use sift_core::store::StoreError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error onto an HTTP-shaped error, keeping domain failures
  /// out of the 500 bucket.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    use sift_core::Error as Core;

    let Some(core) = e.as_core() else {
      return Self::Store(Box::new(e));
    };
    match core {
      Core::CandidateNotFound(_) => Self::NotFound(core.to_string()),
      Core::CandidateDeleted(_)
      | Core::AlreadyJudged { .. }
      | Core::AnnotatorExists(_) => Self::Conflict(core.to_string()),
      Core::InvalidLabel(_) | Core::UnknownCategory { .. } => {
        Self::BadRequest(core.to_string())
      }
    }
  }
}

impl From<sift_core::Error> for ApiError {
  fn from(e: sift_core::Error) -> Self { Self::from_store(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"sift\""),
      );
    }
    res
  }
}
