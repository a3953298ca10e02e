//! [`SqliteStore`] — the SQLite implementation of [`PropositionStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use folkval_core::{
  proposition::{NewProposition, Proposition},
  query::{Column, Comparison, PropositionQuery},
  store::PropositionStore,
  vote::{VoteOutcome, VoteRecord, VoteValue},
};

use crate::{
  Error, Result,
  encode::{RawProposition, RawVote, encode_date, encode_field},
  error::{is_foreign_key_violation, is_unique_violation},
  schema::SCHEMA,
};

/// Current Unix time in whole seconds.
fn now() -> i64 { chrono::Utc::now().timestamp() }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folkval store backed by a single SQLite file.
///
/// The connection is an explicit handle owned by the store and opened once —
/// there is no module-level implicit connection, and no pooling. Cloning is
/// cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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

  // ── Vote recorder internals ───────────────────────────────────────────────

  /// Phase 1: insert a fresh ledger row and bump the matching counter, in
  /// one transaction. Fails with a uniqueness violation if the pair has
  /// already voted, or a foreign-key violation if the proposition is
  /// missing; either way the transaction rolls back whole.
  async fn try_insert_vote(
    &self,
    user_id: i64,
    proposition_id: i64,
    vote: VoteValue,
  ) -> Result<(), tokio_rusqlite::Error> {
    let vote_int = vote.as_i64();
    let ts = now();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO votes (proposition_id, user_id, vote, timestamp)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![proposition_id, user_id, vote_int, ts],
        )?;
        // Direct SQL arithmetic; SQLite serialises row updates, which is
        // the only concurrency guard this layer relies on.
        let counter_sql = match vote {
          VoteValue::Up => {
            "UPDATE propositions SET upvotes = upvotes + 1 WHERE id = ?1"
          }
          VoteValue::Down => {
            "UPDATE propositions SET downvotes = downvotes + 1 WHERE id = ?1"
          }
        };
        tx.execute(counter_sql, rusqlite::params![proposition_id])?;
        tx.commit()?;
        Ok(())
      })
      .await
  }

  /// Phase 2, corrected semantics: read the stored vote before adjusting.
  ///
  /// If the submitted value equals the stored one, only the ledger
  /// timestamp is refreshed and the counters are left untouched, keeping
  /// the up-plus-down total equal to the ledger row count *and* the
  /// up-minus-down differential intact.
  async fn update_existing_vote(
    &self,
    user_id: i64,
    proposition_id: i64,
    vote: VoteValue,
  ) -> Result<VoteOutcome> {
    let new_int = vote.as_i64();
    let ts = now();

    let outcome: Option<VoteOutcome> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let previous: Option<i64> = tx
          .query_row(
            "SELECT vote FROM votes WHERE proposition_id = ?1 AND user_id = ?2",
            rusqlite::params![proposition_id, user_id],
            |row| row.get(0),
          )
          .optional()?;

        let Some(previous) = previous else {
          // Row deleted between the phases; rolls back on drop.
          return Ok(None);
        };

        if previous == new_int {
          tx.execute(
            "UPDATE votes SET timestamp = ?3
             WHERE proposition_id = ?1 AND user_id = ?2",
            rusqlite::params![proposition_id, user_id, ts],
          )?;
          tx.commit()?;
          return Ok(Some(VoteOutcome::Unchanged));
        }

        tx.execute(
          "UPDATE votes SET vote = ?3, timestamp = ?4
           WHERE proposition_id = ?1 AND user_id = ?2",
          rusqlite::params![proposition_id, user_id, new_int, ts],
        )?;
        tx.execute(swing_sql(vote), rusqlite::params![proposition_id])?;
        tx.commit()?;

        // Only two legal values exist, so a differing previous vote is the
        // opposite sign.
        Ok(Some(VoteOutcome::Changed { previous: vote.opposite() }))
      })
      .await?;

    outcome.ok_or(Error::VoteRowMissing { user_id, proposition_id })
  }

  /// Record a vote with the historical counter behavior, preserved
  /// bug-for-bug for comparison against [`PropositionStore::record_vote`].
  ///
  /// The original implementation never read the previous vote: on the
  /// duplicate-vote path it applied the ±1 swing to both counters
  /// unconditionally. When a user repeats the same vote this corrupts the
  /// up-minus-down differential (the up-plus-down total survives) and can
  /// drive a counter below zero. Because it never reads the stored value,
  /// this method reports `Changed` for every duplicate vote.
  pub async fn record_vote_legacy(
    &self,
    user_id: i64,
    proposition_id: i64,
    vote: VoteValue,
  ) -> Result<Option<VoteOutcome>> {
    match self.try_insert_vote(user_id, proposition_id, vote).await {
      Ok(()) => Ok(Some(VoteOutcome::FirstVote)),
      Err(e) if is_foreign_key_violation(&e) => Ok(None),
      Err(e) if is_unique_violation(&e) => {
        let new_int = vote.as_i64();
        let ts = now();

        let rows = self
          .conn
          .call(move |conn| {
            let tx = conn.transaction()?;
            let rows = tx.execute(
              "UPDATE votes SET vote = ?3, timestamp = ?4
               WHERE proposition_id = ?1 AND user_id = ?2",
              rusqlite::params![proposition_id, user_id, new_int, ts],
            )?;
            if rows == 0 {
              return Ok(0);
            }
            tx.execute(swing_sql(vote), rusqlite::params![proposition_id])?;
            tx.commit()?;
            Ok(rows)
          })
          .await?;

        if rows == 0 {
          return Err(Error::VoteRowMissing { user_id, proposition_id });
        }
        Ok(Some(VoteOutcome::Changed { previous: vote.opposite() }))
      }
      Err(e) => Err(e.into()),
    }
  }
}

/// The counter adjustment for a vote that flipped to `new`: increment the
/// matching counter, decrement the opposite one.
fn swing_sql(new: VoteValue) -> &'static str {
  match new {
    VoteValue::Up => {
      "UPDATE propositions
       SET upvotes = upvotes + 1, downvotes = downvotes - 1 WHERE id = ?1"
    }
    VoteValue::Down => {
      "UPDATE propositions
       SET upvotes = upvotes - 1, downvotes = downvotes + 1 WHERE id = ?1"
    }
  }
}

// ─── PropositionStore impl ───────────────────────────────────────────────────

impl PropositionStore for SqliteStore {
  type Error = Error;

  // ── Propositions ──────────────────────────────────────────────────────────

  async fn add_proposition(&self, input: NewProposition) -> Result<Proposition> {
    let updated = now();
    let pub_date_str = encode_date(input.pub_date);
    let title = input.title.clone();
    let url = input.url.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO propositions (updated, upvotes, downvotes, title, url, pub_date)
           VALUES (?1, 0, 0, ?2, ?3, ?4)",
          rusqlite::params![updated, title, url, pub_date_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Proposition {
      prop_id:    id,
      updated,
      up_votes:   0,
      down_votes: 0,
      title:      input.title,
      url:        input.url,
      pub_date:   input.pub_date,
    })
  }

  async fn list_propositions(
    &self,
    limit: u32,
    order_by: Column,
  ) -> Result<Vec<Proposition>> {
    // `order_by` comes from a fixed allow-list; only its `as_sql` form is
    // ever spliced into the statement.
    let sql = format!(
      "SELECT {} FROM propositions ORDER BY {} ASC LIMIT ?1",
      RawProposition::COLUMNS,
      order_by.as_sql(),
    );

    let raws: Vec<RawProposition> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawProposition::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProposition::into_proposition).collect()
  }

  async fn query_propositions(
    &self,
    query: &PropositionQuery,
  ) -> Result<Vec<Proposition>> {
    let mut sql = format!("SELECT {} FROM propositions", RawProposition::COLUMNS);
    let mut params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(filter) = &query.filter {
      sql.push_str(&format!(
        " WHERE {} {}",
        filter.column.as_sql(),
        filter.comparison.operator_sql(),
      ));
      match &filter.comparison {
        Comparison::Between(low, high) => {
          params.push(encode_field(low));
          params.push(encode_field(high));
          sql.push_str(&format!(" ?{} AND ?{}", params.len() - 1, params.len()));
        }
        Comparison::Lt(v)
        | Comparison::Gt(v)
        | Comparison::Le(v)
        | Comparison::Ge(v)
        | Comparison::Eq(v)
        | Comparison::Ne(v) => {
          params.push(encode_field(v));
          sql.push_str(&format!(" ?{}", params.len()));
        }
      }
    }

    if let Some(order) = query.order {
      sql.push_str(&format!(
        " ORDER BY {} {}",
        order.column.as_sql(),
        order.direction.as_sql(),
      ));
    }

    if let Some(limit) = query.limit {
      params.push(rusqlite::types::Value::Integer(limit as i64));
      sql.push_str(&format!(" LIMIT ?{}", params.len()));
    }

    let raws: Vec<RawProposition> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(params),
            RawProposition::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProposition::into_proposition).collect()
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn record_vote(
    &self,
    user_id: i64,
    proposition_id: i64,
    vote: VoteValue,
  ) -> Result<Option<VoteOutcome>> {
    // No "has the user voted" pre-check: the first-time path is attempted
    // outright and the uniqueness constraint signals a duplicate. The two
    // phases are separate transactions, so they are not atomic as a pair;
    // the constraint is the backstop for racing same-pair votes.
    match self.try_insert_vote(user_id, proposition_id, vote).await {
      Ok(()) => Ok(Some(VoteOutcome::FirstVote)),
      Err(e) if is_foreign_key_violation(&e) => Ok(None),
      Err(e) if is_unique_violation(&e) => self
        .update_existing_vote(user_id, proposition_id, vote)
        .await
        .map(Some),
      Err(e) => Err(e.into()),
    }
  }

  async fn get_vote(
    &self,
    user_id: i64,
    proposition_id: i64,
  ) -> Result<Option<VoteRecord>> {
    let raw: Option<RawVote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT proposition_id, user_id, vote, timestamp
               FROM votes WHERE proposition_id = ?1 AND user_id = ?2",
              rusqlite::params![proposition_id, user_id],
              |row| {
                Ok(RawVote {
                  proposition_id: row.get(0)?,
                  user_id:        row.get(1)?,
                  vote:           row.get(2)?,
                  timestamp:      row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVote::into_record).transpose()
  }
}
