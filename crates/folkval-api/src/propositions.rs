//! Handler for `GET /propositions`.
//!
//! Returns stored propositions as a JSON array of
//! `{prop_id, updated, up_votes, down_votes, title, url, pub_date}`, with
//! `pub_date` serialised as an ISO-8601 date string.

use axum::{
  Json,
  extract::{Query, State},
};
use folkval_core::{
  proposition::Proposition,
  query::Column,
  store::PropositionStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Default row cap when the caller does not pass `?limit=`.
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit:    Option<u32>,
  /// One of the allow-listed columns, e.g. `pub_date` or `up_votes`.
  pub order_by: Option<Column>,
}

/// `GET /propositions[?limit=<n>][&order_by=<column>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Proposition>>, ApiError>
where
  S: PropositionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
  let order_by = params.order_by.unwrap_or(Column::Id);

  let propositions = state
    .store
    .list_propositions(limit, order_by)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(propositions))
}
