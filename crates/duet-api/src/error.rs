//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("answer log unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<duet_core::Error> for ApiError {
  fn from(e: duet_core::Error) -> Self {
    match e {
      duet_core::Error::ScoreOutOfRange(_) => Self::BadRequest(e.to_string()),
      duet_core::Error::NothingToRate | duet_core::Error::UnrecognizedHeader => {
        Self::Conflict(e.to_string())
      }
      duet_core::Error::LogUnavailable(inner) => Self::Unavailable(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Unavailable(e) => {
        tracing::error!(error = %e, "answer log unavailable");
        StatusCode::SERVICE_UNAVAILABLE
      }
    };
    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"duet\""),
      );
    }
    res
  }
}
