//! The `PropositionStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `folkval-store-sqlite`). Higher layers (`folkval-api`,
//! `folkval-riksdagen`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  proposition::{NewProposition, Proposition},
  query::{Column, PropositionQuery},
  vote::{VoteOutcome, VoteRecord, VoteValue},
};

/// Abstraction over a Folkval storage backend.
///
/// Propositions are created by ingestion and never deleted; only the vote
/// recorder mutates them (their aggregate counters). The vote ledger holds
/// at most one row per `(proposition_id, user_id)` pair, enforced by a
/// storage uniqueness constraint.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PropositionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Propositions ──────────────────────────────────────────────────────

  /// Insert a new proposition with both counters zeroed and `updated` set
  /// to the current time. The write is transactional.
  fn add_proposition(
    &self,
    input: NewProposition,
  ) -> impl Future<Output = Result<Proposition, Self::Error>> + Send + '_;

  /// Return up to `limit` propositions ordered ascending by `order_by`.
  ///
  /// No tie-break guarantee beyond the storage engine's stable default.
  fn list_propositions(
    &self,
    limit: u32,
    order_by: Column,
  ) -> impl Future<Output = Result<Vec<Proposition>, Self::Error>> + Send + '_;

  /// Return propositions matching `query` (see
  /// [`PropositionQuery`](crate::query::PropositionQuery)). An empty query
  /// returns all propositions.
  fn query_propositions<'a>(
    &'a self,
    query: &'a PropositionQuery,
  ) -> impl Future<Output = Result<Vec<Proposition>, Self::Error>> + Send + 'a;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Record `user_id`'s vote on a proposition.
  ///
  /// First-time votes insert a ledger row and bump the matching counter;
  /// repeat votes are detected by the uniqueness-constraint failure on that
  /// insert (no pre-check round trip) and switch to an update of the
  /// existing row, adjusting counters only if the value actually changed.
  ///
  /// Returns `Ok(None)` if the proposition does not exist. Invalid vote
  /// values never reach this method — they are rejected by
  /// [`VoteValue::try_from`](crate::vote::VoteValue).
  fn record_vote(
    &self,
    user_id: i64,
    proposition_id: i64,
    vote: VoteValue,
  ) -> impl Future<Output = Result<Option<VoteOutcome>, Self::Error>> + Send + '_;

  /// Read the ledger row for a `(user_id, proposition_id)` pair, if the
  /// user has voted on that proposition.
  fn get_vote(
    &self,
    user_id: i64,
    proposition_id: i64,
  ) -> impl Future<Output = Result<Option<VoteRecord>, Self::Error>> + Send + '_;
}
