//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use folkval_core::{
  proposition::NewProposition,
  query::{
    Column, Comparison, Filter, Ordering, PropositionQuery, SortDirection,
  },
  store::PropositionStore,
  vote::{VoteOutcome, VoteValue},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_prop(title: &str, pub_date: NaiveDate) -> NewProposition {
  NewProposition {
    title:    title.to_owned(),
    url:      format!("https://data.riksdagen.se/dokument/{title}"),
    pub_date,
  }
}

async fn seed(s: &SqliteStore, title: &str, pub_date: NaiveDate) -> i64 {
  s.add_proposition(new_prop(title, pub_date))
    .await
    .unwrap()
    .prop_id
}

/// Number of ledger rows for a proposition, read straight from the table.
async fn ledger_rows(s: &SqliteStore, prop_id: i64) -> i64 {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM votes WHERE proposition_id = ?1",
        rusqlite::params![prop_id],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap()
}

async fn counters(s: &SqliteStore, prop_id: i64) -> (i64, i64) {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT upvotes, downvotes FROM propositions WHERE id = ?1",
        rusqlite::params![prop_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )?)
    })
    .await
    .unwrap()
}

// ─── Propositions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_proposition_starts_with_zero_counters() {
  let s = store().await;

  let prop = s
    .add_proposition(new_prop("T", date(2024, 1, 1)))
    .await
    .unwrap();
  assert_eq!(prop.up_votes, 0);
  assert_eq!(prop.down_votes, 0);
  assert_eq!(prop.pub_date, date(2024, 1, 1));

  let all = s.list_propositions(10, Column::Id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0], prop);
}

#[tokio::test]
async fn list_orders_ascending_and_respects_limit() {
  let s = store().await;
  seed(&s, "b", date(2024, 2, 1)).await;
  seed(&s, "a", date(2024, 1, 1)).await;
  seed(&s, "c", date(2024, 3, 1)).await;

  let by_title = s.list_propositions(10, Column::Title).await.unwrap();
  let titles: Vec<&str> = by_title.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, ["a", "b", "c"]);

  let limited = s.list_propositions(2, Column::Id).await.unwrap();
  assert_eq!(limited.len(), 2);
}

// ─── Criteria queries ────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_query_returns_all() {
  let s = store().await;
  seed(&s, "a", date(2024, 1, 1)).await;
  seed(&s, "b", date(2024, 2, 1)).await;

  let all = s
    .query_propositions(&PropositionQuery::default())
    .await
    .unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn query_filters_on_a_single_column() {
  let s = store().await;
  let id = seed(&s, "wanted", date(2024, 1, 1)).await;
  seed(&s, "other", date(2024, 2, 1)).await;

  let query = PropositionQuery {
    filter: Some(Filter {
      column:     Column::Id,
      comparison: Comparison::Eq(id.into()),
    }),
    ..Default::default()
  };
  let hits = s.query_propositions(&query).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].title, "wanted");
}

#[tokio::test]
async fn query_between_is_inclusive_on_dates() {
  let s = store().await;
  seed(&s, "jan", date(2024, 1, 15)).await;
  seed(&s, "feb", date(2024, 2, 15)).await;
  seed(&s, "mar", date(2024, 3, 15)).await;

  let query = PropositionQuery {
    filter: Some(Filter {
      column:     Column::PubDate,
      comparison: Comparison::Between(
        date(2024, 1, 15).into(),
        date(2024, 2, 15).into(),
      ),
    }),
    order:  Some(Ordering {
      column:    Column::PubDate,
      direction: SortDirection::Asc,
    }),
    limit:  None,
  };
  let hits = s.query_propositions(&query).await.unwrap();
  let titles: Vec<&str> = hits.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, ["jan", "feb"]);
}

#[tokio::test]
async fn query_orders_descending_and_limits() {
  let s = store().await;
  seed(&s, "a", date(2024, 1, 1)).await;
  seed(&s, "b", date(2024, 2, 1)).await;
  seed(&s, "c", date(2024, 3, 1)).await;

  let query = PropositionQuery {
    filter: None,
    order:  Some(Ordering {
      column:    Column::PubDate,
      direction: SortDirection::Desc,
    }),
    limit:  Some(2),
  };
  let hits = s.query_propositions(&query).await.unwrap();
  let titles: Vec<&str> = hits.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, ["c", "b"]);
}

// ─── Vote recorder — first votes ─────────────────────────────────────────────

#[tokio::test]
async fn first_upvote_increments_one_counter_and_creates_one_ledger_row() {
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  let outcome = s.record_vote(1, id, VoteValue::Up).await.unwrap();
  assert_eq!(outcome, Some(VoteOutcome::FirstVote));

  assert_eq!(counters(&s, id).await, (1, 0));
  assert_eq!(ledger_rows(&s, id).await, 1);

  let record = s.get_vote(1, id).await.unwrap().unwrap();
  assert_eq!(record.value, VoteValue::Up);
}

#[tokio::test]
async fn first_downvote_increments_the_other_counter() {
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  let outcome = s.record_vote(1, id, VoteValue::Down).await.unwrap();
  assert_eq!(outcome, Some(VoteOutcome::FirstVote));
  assert_eq!(counters(&s, id).await, (0, 1));
  assert_eq!(ledger_rows(&s, id).await, 1);
}

#[tokio::test]
async fn votes_from_distinct_users_each_count() {
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  s.record_vote(1, id, VoteValue::Up).await.unwrap();
  s.record_vote(2, id, VoteValue::Up).await.unwrap();
  s.record_vote(3, id, VoteValue::Down).await.unwrap();

  assert_eq!(counters(&s, id).await, (2, 1));
  assert_eq!(ledger_rows(&s, id).await, 3);
}

#[tokio::test]
async fn vote_for_missing_proposition_reports_none() {
  let s = store().await;
  let outcome = s.record_vote(1, 999, VoteValue::Up).await.unwrap();
  assert_eq!(outcome, None);
}

// ─── Vote recorder — repeat votes ────────────────────────────────────────────

#[tokio::test]
async fn changed_vote_swings_both_counters_and_keeps_one_ledger_row() {
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  s.record_vote(1, id, VoteValue::Up).await.unwrap();
  let outcome = s.record_vote(1, id, VoteValue::Down).await.unwrap();
  assert_eq!(
    outcome,
    Some(VoteOutcome::Changed { previous: VoteValue::Up })
  );

  assert_eq!(counters(&s, id).await, (0, 1));
  assert_eq!(ledger_rows(&s, id).await, 1);

  let record = s.get_vote(1, id).await.unwrap().unwrap();
  assert_eq!(record.value, VoteValue::Down);
}

#[tokio::test]
async fn repeated_same_vote_leaves_counters_unchanged() {
  // Corrected read-before-adjust semantics: re-submitting the stored value
  // must not move either counter.
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  s.record_vote(1, id, VoteValue::Down).await.unwrap();
  let outcome = s.record_vote(1, id, VoteValue::Down).await.unwrap();
  assert_eq!(outcome, Some(VoteOutcome::Unchanged));

  assert_eq!(counters(&s, id).await, (0, 1));
  assert_eq!(ledger_rows(&s, id).await, 1);
}

#[tokio::test]
async fn legacy_repeated_same_vote_corrupts_the_differential() {
  // Historical behavior, preserved deliberately: the swing is applied
  // without reading the previous value, so a repeated down-vote moves both
  // counters. The up-plus-down total still matches the ledger row count,
  // but the differential is wrong and a counter can go negative.
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  s.record_vote_legacy(1, id, VoteValue::Down).await.unwrap();
  let outcome = s.record_vote_legacy(1, id, VoteValue::Down).await.unwrap();
  assert_eq!(
    outcome,
    Some(VoteOutcome::Changed { previous: VoteValue::Up })
  );

  let (up, down) = counters(&s, id).await;
  assert_eq!((up, down), (-1, 2));
  assert_eq!(ledger_rows(&s, id).await, 1);
  assert_eq!(up + down, 1, "total still matches the ledger");
}

#[tokio::test]
async fn legacy_changed_vote_matches_corrected_behavior() {
  // The two implementations only diverge on repeated same-value votes.
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;

  s.record_vote_legacy(1, id, VoteValue::Up).await.unwrap();
  s.record_vote_legacy(1, id, VoteValue::Down).await.unwrap();

  assert_eq!(counters(&s, id).await, (0, 1));
  assert_eq!(ledger_rows(&s, id).await, 1);
}

// ─── get_vote ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_vote_for_silent_user_returns_none() {
  let s = store().await;
  let id = seed(&s, "T", date(2024, 1, 1)).await;
  assert!(s.get_vote(42, id).await.unwrap().is_none());
}
