//! Error types for `duet-core`.
//!
//! Log parsing anomalies (unknown headers, short rows) are absorbed by the
//! reader and never surface here. Only failures the caller has to act on do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("score {0} is outside the 1-5 range")]
  ScoreOutOfRange(i64),

  #[error("no pair is currently displayed")]
  NothingToRate,

  /// The log's header maps to no known layout, so a written answer could
  /// never be read back.
  #[error("answer log header is not recognised; answers cannot be recorded")]
  UnrecognizedHeader,

  #[error("answer log unavailable: {0}")]
  LogUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error from an [`AnswerLog`](crate::log::AnswerLog) call.
  pub fn log<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::LogUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
