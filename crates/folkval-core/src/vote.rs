//! Vote values, ledger records, and recorder outcomes.
//!
//! A vote is either approving (+1) or disapproving (-1). Anything else is
//! rejected at this type boundary, before any storage access.

use serde::{Deserialize, Serialize};

use crate::Error;

/// A valid vote value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
  Up,
  Down,
}

impl VoteValue {
  /// The signed integer stored in the ledger: +1 or -1.
  pub fn as_i64(self) -> i64 {
    match self {
      VoteValue::Up => 1,
      VoteValue::Down => -1,
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      VoteValue::Up => VoteValue::Down,
      VoteValue::Down => VoteValue::Up,
    }
  }
}

impl TryFrom<i64> for VoteValue {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self, Error> {
    match value {
      1 => Ok(VoteValue::Up),
      -1 => Ok(VoteValue::Down),
      other => Err(Error::InvalidVoteValue(other)),
    }
  }
}

/// A row in the vote ledger: at most one per `(proposition_id, user_id)`
/// pair, enforced by a storage uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteRecord {
  pub proposition_id: i64,
  pub user_id:        i64,
  pub value:          VoteValue,
  /// Unix timestamp (seconds) of the last change to this row.
  pub timestamp:      i64,
}

/// What the vote recorder did with a submitted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteOutcome {
  /// First vote by this pair: one ledger row created, one counter bumped.
  FirstVote,
  /// The pair had voted the other way; both counters swung by one.
  Changed { previous: VoteValue },
  /// The pair re-submitted its stored value; counters left untouched.
  Unchanged,
}
