//! Error types for `folkval-riksdagen`.

use thiserror::Error;

/// Failures fetching or decoding the document feed.
#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("feed returned status {0}")]
  Status(reqwest::StatusCode),

  #[error("feed decode error: {0}")]
  Decode(#[from] serde_json::Error),
}

/// Failures of the ingestion job as a whole.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("feed error: {0}")]
  Feed(#[from] Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
