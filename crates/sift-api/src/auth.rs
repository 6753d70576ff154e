//! HTTP Basic-auth extractor for annotators.
//!
//! The Basic username is the numeric annotator id; the password is checked
//! against the argon2 PHC hash held by the store.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use sift_core::store::AnnotationStore;

use crate::{ApiState, error::ApiError};

/// The authenticated annotator making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
  pub annotator_id: i64,
}

/// Produce an argon2 PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Check `password` against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(phc).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

/// Decode `Authorization: Basic …` into `(annotator_id, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(i64, String), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  let annotator_id = username.parse().map_err(|_| ApiError::Unauthorized)?;

  Ok((annotator_id, password.to_owned()))
}

impl<S> FromRequestParts<ApiState<S>> for Requester
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let (annotator_id, password) = basic_credentials(&parts.headers)?;

    let phc = state
      .store
      .annotator_credential(annotator_id)
      .await
      .map_err(ApiError::from_store)?
      .ok_or(ApiError::Unauthorized)?;

    if let Err(e) = verify_password(&password, &phc) {
      tracing::warn!(annotator_id, "rejected credentials");
      return Err(e);
    }

    Ok(Requester { annotator_id })
  }
}
