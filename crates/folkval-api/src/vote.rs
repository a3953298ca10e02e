//! Handler for `POST /vote`.
//!
//! Body: `{"document_id": <string|number>, "vote": <+1|-1>}`. Invalid vote
//! values are rejected with 400 before any storage access; an unknown
//! proposition yields 404.

use axum::{Json, extract::State};
use folkval_core::{store::PropositionStore, vote::{VoteOutcome, VoteValue}};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// TODO: derive the user id from an authenticated session once auth lands.
const PLACEHOLDER_USER_ID: i64 = 1;

/// Clients send the proposition id either as a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
  Number(i64),
  Text(String),
}

impl DocumentId {
  fn resolve(&self) -> Result<i64, ApiError> {
    match self {
      DocumentId::Number(n) => Ok(*n),
      DocumentId::Text(s) => s.trim().parse().map_err(|_| {
        ApiError::BadRequest(format!("document_id {s:?} is not an integer"))
      }),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub document_id: DocumentId,
  pub vote:        i64,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
  pub document_id: i64,
  pub outcome:     VoteOutcome,
}

/// `POST /vote` — body: `{"document_id": 1, "vote": -1}`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<VoteBody>,
) -> Result<Json<VoteResponse>, ApiError>
where
  S: PropositionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let vote = VoteValue::try_from(body.vote)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let document_id = body.document_id.resolve()?;

  let outcome = state
    .store
    .record_vote(PLACEHOLDER_USER_ID, document_id, vote)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("proposition {document_id} not found"))
    })?;

  Ok(Json(VoteResponse { document_id, outcome }))
}
