//! [`SqliteStore`]: the SQLite implementation of [`AnnotationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sift_core::{
  annotator::Annotator,
  candidate::{Candidate, IdRange, NewCandidate},
  judgment::{Judgment, Label, NewJudgment},
  sampler::CandidateSource,
  store::AnnotationStore,
};

use crate::{
  encode::{
    CANDIDATE_COLUMNS, JUDGMENT_COLUMNS, JudgmentRow, RawCandidate, RawJudgment,
    encode_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

/// What a guarded write found when it looked at the target candidate.
enum WriteOutcome {
  Written,
  CandidateMissing,
  CandidateDeleted,
  AlreadyJudged,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A sift store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CandidateSource impl ────────────────────────────────────────────────────

impl CandidateSource for SqliteStore {
  type Error = Error;

  async fn id_range(&self) -> Result<Option<IdRange>> {
    let (min, max): (Option<i64>, Option<i64>) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT MIN(candidate_id), MAX(candidate_id)
           FROM candidates
           WHERE deleted = 0",
          [],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
      })
      .await?;

    Ok(min.zip(max).map(|(min, max)| IdRange { min, max }))
  }

  async fn first_unjudged_from(
    &self,
    annotator_id: i64,
    from: i64,
  ) -> Result<Option<Candidate>> {
    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CANDIDATE_COLUMNS}
           FROM candidates c
           WHERE c.candidate_id >= ?1
             AND c.deleted = 0
             AND NOT EXISTS (
               SELECT 1 FROM judgments j
               WHERE j.candidate_id = c.candidate_id
                 AND j.annotator_id = ?2
                 AND j.status != 'deleted'
             )
           ORDER BY c.candidate_id
           LIMIT 1"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![from, annotator_id],
              RawCandidate::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCandidate::into_candidate).transpose()
  }
}

// ─── AnnotationStore impl ────────────────────────────────────────────────────

impl AnnotationStore for SqliteStore {
  // ── Candidates ────────────────────────────────────────────────────────────

  async fn add_candidate(&self, input: NewCandidate) -> Result<Candidate> {
    let ingested_at = Utc::now();
    let at_str      = encode_dt(ingested_at);
    let NewCandidate { text, external_id, search_term } = input;
    let (text_col, external_col, term_col) =
      (text.clone(), external_id.clone(), search_term.clone());

    let candidate_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO candidates (external_id, text, search_term, deleted, ingested_at)
           VALUES (?1, ?2, ?3, 0, ?4)",
          rusqlite::params![external_col, text_col, term_col, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Candidate {
      candidate_id,
      external_id,
      text,
      search_term,
      deleted: false,
      ingested_at,
    })
  }

  async fn get_candidate(&self, candidate_id: i64) -> Result<Option<Candidate>> {
    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![candidate_id], RawCandidate::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCandidate::into_candidate).transpose()
  }

  async fn delete_candidate(
    &self,
    annotator_id: i64,
    candidate_id: i64,
  ) -> Result<Judgment> {
    let judgment = Judgment {
      judgment_id: Uuid::new_v4(),
      candidate_id,
      annotator_id,
      label: Label::Deleted,
      status: Label::Deleted.status(),
      recorded_at: Utc::now(),
    };
    let row = JudgmentRow::new(&judgment);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = tx.execute(
          "UPDATE candidates SET deleted = 1 WHERE candidate_id = ?1",
          rusqlite::params![row.candidate_id],
        )?;
        let outcome = if updated == 0 {
          WriteOutcome::CandidateMissing
        } else {
          row.insert(&tx)?;
          WriteOutcome::Written
        };
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    match outcome {
      WriteOutcome::Written => {
        tracing::info!(candidate_id, annotator_id, "candidate soft-deleted");
        Ok(judgment)
      }
      _ => Err(sift_core::Error::CandidateNotFound(candidate_id).into()),
    }
  }

  // ── Judgments ─────────────────────────────────────────────────────────────

  async fn record_judgment(&self, input: NewJudgment) -> Result<Judgment> {
    if input.label == Label::Deleted {
      return Err(
        sift_core::Error::InvalidLabel(
          "deleted judgments are only written by candidate deletion".into(),
        )
        .into(),
      );
    }

    let judgment = Judgment {
      judgment_id:  Uuid::new_v4(),
      candidate_id: input.candidate_id,
      annotator_id: input.annotator_id,
      label:        input.label,
      status:       input.label.status(),
      recorded_at:  Utc::now(),
    };
    let row = JudgmentRow::new(&judgment);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let deleted: Option<bool> = tx
          .query_row(
            "SELECT deleted FROM candidates WHERE candidate_id = ?1",
            rusqlite::params![row.candidate_id],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match deleted {
          None => WriteOutcome::CandidateMissing,
          Some(true) => WriteOutcome::CandidateDeleted,
          Some(false) => {
            let judged = tx
              .query_row(
                "SELECT 1 FROM judgments
                 WHERE candidate_id = ?1 AND annotator_id = ?2 AND status != 'deleted'",
                rusqlite::params![row.candidate_id, row.annotator_id],
                |_| Ok(true),
              )
              .optional()?
              .unwrap_or(false);
            if judged {
              WriteOutcome::AlreadyJudged
            } else {
              row.insert(&tx)?;
              WriteOutcome::Written
            }
          }
        };
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    let (candidate_id, annotator_id) = (judgment.candidate_id, judgment.annotator_id);
    match outcome {
      WriteOutcome::Written => Ok(judgment),
      WriteOutcome::CandidateMissing => {
        Err(sift_core::Error::CandidateNotFound(candidate_id).into())
      }
      WriteOutcome::CandidateDeleted => {
        Err(sift_core::Error::CandidateDeleted(candidate_id).into())
      }
      WriteOutcome::AlreadyJudged => {
        Err(sift_core::Error::AlreadyJudged { candidate_id, annotator_id }.into())
      }
    }
  }

  async fn list_judgments(&self, annotator_id: i64) -> Result<Vec<Judgment>> {
    let raws: Vec<RawJudgment> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {JUDGMENT_COLUMNS} FROM judgments
           WHERE annotator_id = ?1
           ORDER BY rowid"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![annotator_id], RawJudgment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJudgment::into_judgment).collect()
  }

  async fn count_judgments(&self, annotator_id: i64) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM judgments WHERE annotator_id = ?1",
          rusqlite::params![annotator_id],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  // ── Annotators ────────────────────────────────────────────────────────────

  async fn add_annotator(
    &self,
    annotator_id: i64,
    password_hash: String,
  ) -> Result<Annotator> {
    let annotator = Annotator { annotator_id, created_at: Utc::now() };
    let at_str    = encode_dt(annotator.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO annotators (annotator_id, password_hash, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![annotator_id, password_hash, at_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      return Err(sift_core::Error::AnnotatorExists(annotator_id).into());
    }
    Ok(annotator)
  }

  async fn annotator_credential(&self, annotator_id: i64) -> Result<Option<String>> {
    let hash: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT password_hash FROM annotators WHERE annotator_id = ?1",
              rusqlite::params![annotator_id],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(hash)
  }
}
