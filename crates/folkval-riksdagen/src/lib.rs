//! Riksdagen open-data feed client and proposition ingestion job.
//!
//! Fetches proposition documents from `data.riksdagen.se` and writes new
//! ones into any [`folkval_core::store::PropositionStore`].

pub mod error;
pub mod feed;
pub mod ingest;

pub use error::{Error, IngestError, Result};
pub use feed::{FeedClient, FeedDocument};
pub use ingest::{fetch_and_store, store_documents};
