//! The ingestion job: fetch proposition documents and store new rows.
//!
//! Not idempotent: there is no existence check, so re-running over
//! overlapping date ranges inserts duplicate proposition rows. Accepted
//! limitation of the feed format — documents carry no stable key we persist.

use chrono::NaiveDate;
use folkval_core::{proposition::NewProposition, store::PropositionStore};

use crate::{
  IngestError,
  feed::{FeedClient, FeedDocument},
};

/// Write `documents` into `store`, one proposition each. Documents whose
/// publish date does not parse as `YYYY-MM-DD` are logged and skipped.
/// Returns the number of propositions stored.
pub async fn store_documents<S>(
  store: &S,
  documents: Vec<FeedDocument>,
) -> Result<usize, IngestError>
where
  S: PropositionStore,
{
  let mut stored = 0;

  for doc in documents {
    let pub_date = match doc.publish_date() {
      Ok(d) => d,
      Err(e) => {
        tracing::warn!(
          title = %doc.titel,
          datum = %doc.datum,
          error = %e,
          "skipping document with unparseable publish date"
        );
        continue;
      }
    };

    store
      .add_proposition(NewProposition {
        title: doc.titel,
        url: doc.dokument_url_html,
        pub_date,
      })
      .await
      .map_err(|e| IngestError::Store(Box::new(e)))?;
    stored += 1;
  }

  Ok(stored)
}

/// Fetch all propositions published in `[start, end]` and store them.
/// Returns the number of propositions stored.
pub async fn fetch_and_store<S>(
  client: &FeedClient,
  store: &S,
  start: NaiveDate,
  end: NaiveDate,
) -> Result<usize, IngestError>
where
  S: PropositionStore,
{
  let documents = client.fetch_propositions(start, end).await?;
  tracing::info!(count = documents.len(), %start, %end, "fetched feed documents");
  store_documents(store, documents).await
}

#[cfg(test)]
mod tests {
  use folkval_core::{query::Column, store::PropositionStore};
  use folkval_store_sqlite::SqliteStore;

  use super::*;
  use crate::feed::parse_feed;

  fn doc(titel: &str, datum: &str) -> FeedDocument {
    FeedDocument {
      titel:             titel.to_owned(),
      dokument_url_html: format!("//u/{titel}"),
      datum:             datum.to_owned(),
    }
  }

  #[tokio::test]
  async fn stores_each_document_as_a_proposition() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let stored =
      store_documents(&store, vec![doc("A", "2024-01-01"), doc("B", "2024-01-02")])
        .await
        .unwrap();
    assert_eq!(stored, 2);

    let all = store.list_propositions(10, Column::Title).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "A");
    assert_eq!(all[0].url, "//u/A");
    assert_eq!(all[0].up_votes, 0);
  }

  #[tokio::test]
  async fn single_object_feed_yields_exactly_one_stored_proposition() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let body = r#"{
      "dokumentlista": {
        "dokument": {"titel": "Solo", "dokument_url_html": "//u/s", "datum": "2024-01-01"}
      }
    }"#;

    let documents = parse_feed(body).unwrap();
    let stored = store_documents(&store, documents).await.unwrap();
    assert_eq!(stored, 1);

    let all = store.list_propositions(10, Column::Id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Solo");
  }

  #[tokio::test]
  async fn unparseable_dates_are_skipped_not_fatal() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let stored =
      store_documents(&store, vec![doc("bad", "not-a-date"), doc("good", "2024-05-01")])
        .await
        .unwrap();
    assert_eq!(stored, 1);

    let all = store.list_propositions(10, Column::Id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "good");
  }

  #[tokio::test]
  async fn rerunning_the_job_duplicates_rows() {
    // Documented limitation: no existence check, so overlapping ranges
    // insert the same document twice.
    let store = SqliteStore::open_in_memory().await.unwrap();

    store_documents(&store, vec![doc("A", "2024-01-01")]).await.unwrap();
    store_documents(&store, vec![doc("A", "2024-01-01")]).await.unwrap();

    let all = store.list_propositions(10, Column::Id).await.unwrap();
    assert_eq!(all.len(), 2);
  }
}
