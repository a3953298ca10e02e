//! Error types for `folkval-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A vote value outside {+1, -1}. Raised before any storage access.
  #[error("invalid vote value: {0} (expected +1 or -1)")]
  InvalidVoteValue(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
