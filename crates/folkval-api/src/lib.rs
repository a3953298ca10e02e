//! JSON REST API for Folkval.
//!
//! Exposes an axum [`Router`] backed by any
//! [`folkval_core::store::PropositionStore`]. All responses carry a
//! permissive CORS header; an optional static asset directory is served as
//! the router fallback.
//!
//! | Method | Path            | Notes                                   |
//! |--------|-----------------|-----------------------------------------|
//! | `GET`  | `/propositions` | Optional `?limit=` and `?order_by=`     |
//! | `POST` | `/vote`         | Body: `{"document_id": ..., "vote": ±1}` |

pub mod error;
pub mod propositions;
pub mod vote;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use folkval_core::store::PropositionStore;
use serde::Deserialize;
use tower_http::{
  cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `FOLKVAL_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  /// Directory of static frontend assets, served as the router fallback.
  #[serde(default)]
  pub static_dir:    Option<PathBuf>,
  #[serde(default = "default_feed_base_url")]
  pub feed_base_url: String,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5678 }
fn default_store_path() -> PathBuf { PathBuf::from("folkval.db") }
fn default_feed_base_url() -> String {
  folkval_riksdagen::feed::DEFAULT_BASE_URL.to_owned()
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig {
      host:          default_host(),
      port:          default_port(),
      store_path:    default_store_path(),
      static_dir:    None,
      feed_base_url: default_feed_base_url(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PropositionStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the voting API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PropositionStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let static_dir = state.config.static_dir.clone();

  let mut router = Router::new()
    .route("/propositions", get(propositions::list::<S>))
    .route("/vote", post(vote::submit::<S>))
    .with_state(state);

  if let Some(dir) = static_dir {
    router = router.fallback_service(ServeDir::new(dir));
  }

  router
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
