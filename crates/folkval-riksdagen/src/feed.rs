//! Wire types and HTTP client for the Riksdagen `dokumentlista` feed.
//!
//! The feed wraps its documents as `{dokumentlista: {dokument: [...]}}`,
//! except when exactly one document matches — then `dokument` is a bare
//! object instead of an array. [`parse_feed`] normalises both shapes.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{Error, Result};

/// Public base URL of the Riksdagen open-data API.
pub const DEFAULT_BASE_URL: &str = "https://data.riksdagen.se";

// ─── Wire types ──────────────────────────────────────────────────────────────

/// One proposition document as served by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedDocument {
  /// Document title.
  pub titel: String,
  /// URL of the HTML rendering at riksdagen.se.
  pub dokument_url_html: String,
  /// Publish date as a `YYYY-MM-DD` string.
  pub datum: String,
}

impl FeedDocument {
  /// Parse the feed's `YYYY-MM-DD` publish date.
  pub fn publish_date(&self) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(&self.datum, "%Y-%m-%d")
  }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
  dokumentlista: DocumentList,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
  #[serde(default, deserialize_with = "one_or_many")]
  dokument: Vec<FeedDocument>,
}

/// Accept both a single document object and an array of them.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<FeedDocument>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum OneOrMany {
    One(FeedDocument),
    Many(Vec<FeedDocument>),
  }

  Ok(match OneOrMany::deserialize(deserializer)? {
    OneOrMany::One(doc) => vec![doc],
    OneOrMany::Many(docs) => docs,
  })
}

/// Decode a raw feed response body into its documents.
pub fn parse_feed(body: &str) -> Result<Vec<FeedDocument>> {
  let response: FeedResponse = serde_json::from_str(body)?;
  Ok(response.dokumentlista.dokument)
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// HTTP client for the proposition feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
  http:     reqwest::Client,
  base_url: String,
}

impl Default for FeedClient {
  fn default() -> Self { Self::new(DEFAULT_BASE_URL) }
}

impl FeedClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    FeedClient {
      http:     reqwest::Client::new(),
      base_url: base_url.into(),
    }
  }

  /// Fetch proposition documents published between `start` and `end`
  /// (inclusive). Non-2xx responses are errors.
  pub async fn fetch_propositions(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<FeedDocument>> {
    let url = format!("{}/dokumentlista/", self.base_url);
    let response = self
      .http
      .get(&url)
      .query(&[
        ("doktyp", "prop".to_owned()),
        ("from", start.to_string()),
        ("tom", end.to_string()),
        ("utformat", "json".to_owned()),
      ])
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(Error::Status(response.status()));
    }

    let body = response.text().await?;
    parse_feed(&body)
  }
}
