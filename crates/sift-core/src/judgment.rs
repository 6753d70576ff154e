//! Judgments: one annotator's recorded verdict on one candidate.
//!
//! A judgment is written once and never updated. Its categorical fields are
//! mutually constrained by the hate-speech flag; [`Label`] encodes those
//! constraints in the type so an invalid combination cannot be persisted.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Category enumerations ───────────────────────────────────────────────────

/// String conversions shared by the categorical column types.
///
/// The string form is the snake_case variant name, identical to the serde
/// representation.
pub trait Category: Copy + FromStr + Into<&'static str> {
  /// Human-readable name of the enumeration, used in parse errors.
  const KIND: &'static str;

  fn as_str(self) -> &'static str { self.into() }

  fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownCategory {
      kind:  Self::KIND,
      value: s.to_owned(),
    })
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MainCategory {
  Cyberbullying,
  OnlineHateSpeech,
  Benign,
  NotClassifiable,
  Deleted,
}

impl Category for MainCategory {
  const KIND: &'static str = "main category";
}

/// Refinement of [`MainCategory::OnlineHateSpeech`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubCategory {
  IncitementToViolence,
  GenderDiscrimination,
  NationalDiscrimination,
  SocialClassDiscrimination,
  TribalDiscrimination,
  ReligionDiscrimination,
  RegionalDiscrimination,
  GeneralHate,
}

impl Category for SubCategory {
  const KIND: &'static str = "sub-category";
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sentiment {
  Positive,
  Neutral,
  Negative,
}

impl Category for Sentiment {
  const KIND: &'static str = "sentiment";
}

/// The status tag stored alongside every judgment.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JudgmentStatus {
  Classified,
  NotClassifiable,
  Deleted,
}

impl Category for JudgmentStatus {
  const KIND: &'static str = "status";
}

// ─── Label ───────────────────────────────────────────────────────────────────

/// The hate-speech branch of a [`Label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "main", content = "sub", rename_all = "snake_case")]
pub enum HateCategory {
  Cyberbullying,
  OnlineHateSpeech(SubCategory),
}

/// A validated judgment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Label {
  Hate { category: HateCategory },
  Benign { sentiment: Sentiment },
  /// The annotator could not decide.
  NotClassifiable,
  /// Written by the soft-delete path only.
  Deleted,
}

/// The flat, column-shaped view of a [`Label`], as submitted by a form or
/// stored in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelParts {
  pub is_hate_speech: bool,
  /// `None` together with `is_hate_speech = false` means benign.
  #[serde(default)]
  pub main_category:  Option<MainCategory>,
  #[serde(default)]
  pub sub_category:   Option<SubCategory>,
  #[serde(default)]
  pub sentiment:      Option<Sentiment>,
}

impl Label {
  /// Validate a flat combination of fields submitted by an annotator.
  ///
  /// `deleted` is never accepted here; that label comes only from
  /// soft-deleting a candidate.
  pub fn from_parts(parts: LabelParts) -> Result<Self> {
    use MainCategory as M;

    let LabelParts { is_hate_speech, main_category, sub_category, sentiment } = parts;

    if is_hate_speech {
      if sentiment.is_some() {
        return Err(invalid("sentiment must be absent for hate speech"));
      }
      return match main_category {
        Some(M::Cyberbullying) => match sub_category {
          None => Ok(Self::Hate { category: HateCategory::Cyberbullying }),
          Some(_) => Err(invalid("cyberbullying takes no sub-category")),
        },
        Some(M::OnlineHateSpeech) => sub_category
          .map(|sub| Self::Hate { category: HateCategory::OnlineHateSpeech(sub) })
          .ok_or_else(|| invalid("online hate speech requires a sub-category")),
        Some(other) => Err(invalid(format!(
          "{} is not a hate-speech category",
          other.as_str()
        ))),
        None => Err(invalid("hate speech requires a main category")),
      };
    }

    if sub_category.is_some() {
      return Err(invalid("sub-category requires hate speech"));
    }

    match main_category {
      None | Some(M::Benign) => sentiment
        .map(|sentiment| Self::Benign { sentiment })
        .ok_or_else(|| invalid("benign items require a sentiment")),
      Some(M::NotClassifiable) => match sentiment {
        None => Ok(Self::NotClassifiable),
        Some(_) => Err(invalid("not-classifiable items take no sentiment")),
      },
      Some(M::Deleted) => Err(invalid(
        "deleted judgments are only written by candidate deletion",
      )),
      Some(other @ (M::Cyberbullying | M::OnlineHateSpeech)) => Err(invalid(
        format!("{} requires is_hate_speech", other.as_str()),
      )),
    }
  }

  /// Project onto the flat field view. `main_category` is always `Some`.
  pub fn parts(self) -> LabelParts {
    let (is_hate_speech, main, sub_category, sentiment) = match self {
      Self::Hate { category: HateCategory::Cyberbullying } => {
        (true, MainCategory::Cyberbullying, None, None)
      }
      Self::Hate { category: HateCategory::OnlineHateSpeech(sub) } => {
        (true, MainCategory::OnlineHateSpeech, Some(sub), None)
      }
      Self::Benign { sentiment } => {
        (false, MainCategory::Benign, None, Some(sentiment))
      }
      Self::NotClassifiable => (false, MainCategory::NotClassifiable, None, None),
      Self::Deleted => (false, MainCategory::Deleted, None, None),
    };
    LabelParts {
      is_hate_speech,
      main_category: Some(main),
      sub_category,
      sentiment,
    }
  }

  pub fn status(self) -> JudgmentStatus {
    match self {
      Self::Hate { .. } | Self::Benign { .. } => JudgmentStatus::Classified,
      Self::NotClassifiable => JudgmentStatus::NotClassifiable,
      Self::Deleted => JudgmentStatus::Deleted,
    }
  }
}

fn invalid(msg: impl Into<String>) -> Error { Error::InvalidLabel(msg.into()) }

// ─── Judgment ────────────────────────────────────────────────────────────────

/// An immutable annotation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgment {
  pub judgment_id:  Uuid,
  pub candidate_id: i64,
  pub annotator_id: i64,
  pub label:        Label,
  pub status:       JudgmentStatus,
  /// Server-assigned timestamp; never changes after creation.
  pub recorded_at:  DateTime<Utc>,
}

/// Input to [`crate::store::AnnotationStore::record_judgment`].
#[derive(Debug, Clone, Copy)]
pub struct NewJudgment {
  pub candidate_id: i64,
  pub annotator_id: i64,
  pub label:        Label,
}
