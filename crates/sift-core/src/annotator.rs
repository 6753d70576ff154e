//! Annotators: the requesters who judge candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered annotator. The credential hash is never part of this type;
/// it is only read back through
/// [`AnnotationStore::annotator_credential`](crate::store::AnnotationStore::annotator_credential).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotator {
  pub annotator_id: i64,
  pub created_at:   DateTime<Utc>,
}
