//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as Unix epoch seconds (INTEGER), publish dates as
//! ISO-8601 `YYYY-MM-DD` strings, and vote values as +1/-1 integers.

use chrono::NaiveDate;
use folkval_core::{
  proposition::Proposition,
  query::FieldValue,
  vote::{VoteRecord, VoteValue},
};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Filter values ───────────────────────────────────────────────────────────

/// Convert a query filter value into a bindable SQLite parameter.
pub fn encode_field(v: &FieldValue) -> rusqlite::types::Value {
  use rusqlite::types::Value;
  match v {
    FieldValue::Integer(i) => Value::Integer(*i),
    FieldValue::Text(s) => Value::Text(s.clone()),
    FieldValue::Date(d) => Value::Text(encode_date(*d)),
  }
}

// ─── Vote values ─────────────────────────────────────────────────────────────

pub fn decode_vote_value(v: i64) -> Result<VoteValue> {
  Ok(VoteValue::try_from(v)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read directly from a `propositions` row.
pub struct RawProposition {
  pub id:        i64,
  pub updated:   i64,
  pub upvotes:   i64,
  pub downvotes: i64,
  pub title:     String,
  pub url:       String,
  pub pub_date:  String,
}

impl RawProposition {
  /// The SELECT column list matching [`Self::from_row`]'s ordering.
  pub const COLUMNS: &'static str =
    "id, updated, upvotes, downvotes, title, url, pub_date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawProposition {
      id:        row.get(0)?,
      updated:   row.get(1)?,
      upvotes:   row.get(2)?,
      downvotes: row.get(3)?,
      title:     row.get(4)?,
      url:       row.get(5)?,
      pub_date:  row.get(6)?,
    })
  }

  pub fn into_proposition(self) -> Result<Proposition> {
    Ok(Proposition {
      prop_id:    self.id,
      updated:    self.updated,
      up_votes:   self.upvotes,
      down_votes: self.downvotes,
      title:      self.title,
      url:        self.url,
      pub_date:   decode_date(&self.pub_date)?,
    })
  }
}

/// Raw column values read directly from a `votes` row.
pub struct RawVote {
  pub proposition_id: i64,
  pub user_id:        i64,
  pub vote:           i64,
  pub timestamp:      i64,
}

impl RawVote {
  pub fn into_record(self) -> Result<VoteRecord> {
    Ok(VoteRecord {
      proposition_id: self.proposition_id,
      user_id:        self.user_id,
      value:          decode_vote_value(self.vote)?,
      timestamp:      self.timestamp,
    })
  }
}
