//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! categories their snake_case names.

use chrono::{DateTime, Utc};
use sift_core::{
  candidate::Candidate,
  judgment::{
    Category, Judgment, JudgmentStatus, Label, LabelParts, MainCategory, Sentiment,
    SubCategory,
  },
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Label ───────────────────────────────────────────────────────────────────

/// Sub-category column value written for deleted judgments.
const DELETED_SUB_CATEGORY: &str = "deleted";

/// Column values for the categorical fields of a judgment row.
pub struct LabelColumns {
  pub is_hate_speech: bool,
  pub main_category:  &'static str,
  pub sub_category:   Option<&'static str>,
  pub sentiment:      Option<&'static str>,
  pub status:         &'static str,
}

pub fn encode_label(label: Label) -> LabelColumns {
  let parts = label.parts();
  let main = parts.main_category.unwrap_or(MainCategory::Benign);
  let sub_category = match label {
    Label::Deleted => Some(DELETED_SUB_CATEGORY),
    _ => parts.sub_category.map(Category::as_str),
  };
  LabelColumns {
    is_hate_speech: parts.is_hate_speech,
    main_category: main.as_str(),
    sub_category,
    sentiment: parts.sentiment.map(Category::as_str),
    status: label.status().as_str(),
  }
}

fn decode_label(
  is_hate_speech: bool,
  main_category: &str,
  sub_category: Option<&str>,
  sentiment: Option<&str>,
) -> Result<Label> {
  let main = MainCategory::parse(main_category)?;
  if main == MainCategory::Deleted {
    return Ok(Label::Deleted);
  }
  let parts = LabelParts {
    is_hate_speech,
    main_category: Some(main),
    sub_category: sub_category.map(SubCategory::parse).transpose()?,
    sentiment: sentiment.map(Sentiment::parse).transpose()?,
  };
  Ok(Label::from_parts(parts)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCandidate::from_row`].
pub const CANDIDATE_COLUMNS: &str =
  "candidate_id, external_id, text, search_term, deleted, ingested_at";

/// Raw values read directly from a `candidates` row.
pub struct RawCandidate {
  pub candidate_id: i64,
  pub external_id:  Option<String>,
  pub text:         String,
  pub search_term:  Option<String>,
  pub deleted:      bool,
  pub ingested_at:  String,
}

impl RawCandidate {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id: row.get(0)?,
      external_id:  row.get(1)?,
      text:         row.get(2)?,
      search_term:  row.get(3)?,
      deleted:      row.get(4)?,
      ingested_at:  row.get(5)?,
    })
  }

  pub fn into_candidate(self) -> Result<Candidate> {
    Ok(Candidate {
      candidate_id: self.candidate_id,
      external_id:  self.external_id,
      text:         self.text,
      search_term:  self.search_term,
      deleted:      self.deleted,
      ingested_at:  decode_dt(&self.ingested_at)?,
    })
  }
}

/// Column list matching [`RawJudgment::from_row`].
pub const JUDGMENT_COLUMNS: &str = "judgment_id, candidate_id, annotator_id, \
   is_hate_speech, main_category, sub_category, sentiment, status, recorded_at";

/// Raw values read directly from a `judgments` row.
pub struct RawJudgment {
  pub judgment_id:    String,
  pub candidate_id:   i64,
  pub annotator_id:   i64,
  pub is_hate_speech: bool,
  pub main_category:  String,
  pub sub_category:   Option<String>,
  pub sentiment:      Option<String>,
  pub status:         String,
  pub recorded_at:    String,
}

impl RawJudgment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      judgment_id:    row.get(0)?,
      candidate_id:   row.get(1)?,
      annotator_id:   row.get(2)?,
      is_hate_speech: row.get(3)?,
      main_category:  row.get(4)?,
      sub_category:   row.get(5)?,
      sentiment:      row.get(6)?,
      status:         row.get(7)?,
      recorded_at:    row.get(8)?,
    })
  }

  /// Decode the row. The stored status must be the one its label implies.
  pub fn into_judgment(self) -> Result<Judgment> {
    let label = decode_label(
      self.is_hate_speech,
      &self.main_category,
      self.sub_category.as_deref(),
      self.sentiment.as_deref(),
    )?;
    let status = JudgmentStatus::parse(&self.status)?;
    if status != label.status() {
      return Err(Error::StatusMismatch {
        judgment_id: self.judgment_id,
        stored:      self.status,
      });
    }

    Ok(Judgment {
      judgment_id: decode_uuid(&self.judgment_id)?,
      candidate_id: self.candidate_id,
      annotator_id: self.annotator_id,
      label,
      status,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Owned column values for inserting a [`Judgment`].
pub struct JudgmentRow {
  pub judgment_id:  String,
  pub candidate_id: i64,
  pub annotator_id: i64,
  pub label:        LabelColumns,
  pub recorded_at:  String,
}

impl JudgmentRow {
  pub fn new(judgment: &Judgment) -> Self {
    Self {
      judgment_id:  encode_uuid(judgment.judgment_id),
      candidate_id: judgment.candidate_id,
      annotator_id: judgment.annotator_id,
      label:        encode_label(judgment.label),
      recorded_at:  encode_dt(judgment.recorded_at),
    }
  }

  pub fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT INTO judgments (
         judgment_id, candidate_id, annotator_id, is_hate_speech,
         main_category, sub_category, sentiment, status, recorded_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      rusqlite::params![
        self.judgment_id,
        self.candidate_id,
        self.annotator_id,
        self.label.is_hate_speech,
        self.label.main_category,
        self.label.sub_category,
        self.label.sentiment,
        self.label.status,
        self.recorded_at,
      ],
    )?;
    Ok(())
  }
}
