//! HTTP Basic-auth middleware for the rating API.
//!
//! Only mounted when credentials are configured; the rater's password is
//! stored as an argon2 PHC string, never in plain text.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

use crate::error::ApiError;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Split an `Authorization: Basic …` header into `(username, password)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let encoded = headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;
  let decoded = String::from_utf8(B64.decode(encoded.trim()).ok()?).ok()?;
  let (user, pass) = decoded.split_once(':')?;
  Some((user.to_owned(), pass.to_owned()))
}

/// Check the request's Basic credentials against `config` and return the
/// rater's username.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<String, ApiError> {
  let (username, password) = basic_credentials(headers).ok_or(ApiError::Unauthorized)?;

  let hash = PasswordHash::new(&config.password_hash).map_err(|e| {
    tracing::error!(error = %e, "configured password hash is not a PHC string");
    ApiError::Unauthorized
  })?;
  let password_ok = Argon2::default()
    .verify_password(password.as_bytes(), &hash)
    .is_ok();

  if username == config.username && password_ok {
    Ok(username)
  } else {
    tracing::debug!(%username, "credentials rejected");
    Err(ApiError::Unauthorized)
  }
}

/// Reject the request with 401 unless it carries valid credentials.
pub async fn require_basic_auth(
  State(config): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, ApiError> {
  match verify_auth(req.headers(), &config) {
    Ok(username) => {
      tracing::trace!(%username, path = %req.uri().path(), "authenticated");
      Ok(next.run(req).await)
    }
    Err(e) => {
      tracing::debug!(path = %req.uri().path(), "rejected unauthenticated request");
      Err(e)
    }
  }
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::HeaderValue;
  use rand_core::OsRng;

  use super::*;

  fn config(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    AuthConfig { username: "rater".into(), password_hash: hash }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(
      axum::http::header::AUTHORIZATION,
      HeaderValue::from_str(value).unwrap(),
    );
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn correct_credentials_pass() {
    let cfg = config("s3cret");
    let user = verify_auth(&headers(&basic("rater", "s3cret")), &cfg).unwrap();
    assert_eq!(user, "rater");
  }

  #[test]
  fn wrong_password_fails() {
    let cfg = config("s3cret");
    assert!(verify_auth(&headers(&basic("rater", "nope")), &cfg).is_err());
  }

  #[test]
  fn wrong_user_fails() {
    let cfg = config("s3cret");
    assert!(verify_auth(&headers(&basic("mallory", "s3cret")), &cfg).is_err());
  }

  #[test]
  fn missing_or_garbled_header_fails() {
    let cfg = config("s3cret");
    assert!(verify_auth(&HeaderMap::new(), &cfg).is_err());
    assert!(verify_auth(&headers("Bearer abc"), &cfg).is_err());
    assert!(verify_auth(&headers("Basic !!!"), &cfg).is_err());
    assert!(verify_auth(&headers(&format!("Basic {}", B64.encode("no-colon"))), &cfg).is_err());
  }

  #[test]
  fn malformed_configured_hash_rejects_everyone() {
    let cfg = AuthConfig { username: "rater".into(), password_hash: "plaintext".into() };
    assert!(verify_auth(&headers(&basic("rater", "plaintext")), &cfg).is_err());
  }
}
