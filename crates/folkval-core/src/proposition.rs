//! Proposition — a legislative document record with aggregate vote counts.
//!
//! The aggregate counters are denormalized onto the proposition row for fast
//! reads; the per-user vote ledger (see [`crate::vote`]) is the underlying
//! source of truth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored proposition.
///
/// Field names match the wire shape served by `GET /propositions`;
/// `pub_date` serialises as an ISO-8601 `YYYY-MM-DD` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
  /// Internal storage-assigned row id.
  pub prop_id:    i64,
  /// Unix timestamp (seconds) of the last database update.
  pub updated:    i64,
  /// Number of approving votes. Non-negative by invariant; equal, together
  /// with `down_votes`, to the number of ledger rows for this proposition.
  pub up_votes:   i64,
  /// Number of disapproving votes.
  pub down_votes: i64,
  pub title:      String,
  /// URL of the proposition document at the source.
  pub url:        String,
  /// Date of publication at the source.
  pub pub_date:   NaiveDate,
}

/// Input for creating a proposition. Counters start at zero and the
/// `updated` timestamp is set by the store.
#[derive(Debug, Clone)]
pub struct NewProposition {
  pub title:    String,
  pub url:      String,
  pub pub_date: NaiveDate,
}
