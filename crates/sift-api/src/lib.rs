//! JSON REST API for sift.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sift_core::store::AnnotationStore`]. Every route requires HTTP Basic
//! credentials of a registered annotator. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sift_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod items;
pub mod judgments;
pub mod progress;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use sift_core::{sampler::Sampler, store::AnnotationStore};

pub use auth::Requester;
pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S: AnnotationStore> {
  pub store:   Arc<S>,
  pub sampler: Sampler,
}

impl<S: AnnotationStore> ApiState<S> {
  pub fn new(store: Arc<S>, sampler: Sampler) -> Self { Self { store, sampler } }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: AnnotationStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/items/next", get(items::next::<S>))
    .route("/judgments", get(judgments::list::<S>).post(judgments::create::<S>))
    .route("/candidates/{id}/delete", post(judgments::delete::<S>))
    .route("/progress", get(progress::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
