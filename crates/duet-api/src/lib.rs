//! JSON HTTP API for a Duet rating session.
//!
//! Exposes an axum [`Router`] over a single shared
//! [`Session`](duet_core::session::Session). Requests are serialised through
//! one mutex: the engine supports one rater at a time.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(session, None);
//! axum::serve(listener, duet_api::api_router(state)).await?;
//! ```

pub mod auth;
pub mod catalog;
pub mod error;
pub mod rating;

use std::sync::Arc;

use axum::{
  Router, middleware,
  routing::{get, post},
};
use duet_core::{log::AnswerLog, session::Session};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub use auth::AuthConfig;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<L> {
  pub session: Arc<Mutex<Session<L>>>,
  /// `None` leaves the API open.
  pub auth:    Option<Arc<AuthConfig>>,
}

impl<L> AppState<L> {
  pub fn new(session: Session<L>, auth: Option<AuthConfig>) -> Self {
    Self {
      session: Arc::new(Mutex::new(session)),
      auth:    auth.map(Arc::new),
    }
  }
}

impl<L> Clone for AppState<L> {
  fn clone(&self) -> Self {
    Self { session: Arc::clone(&self.session), auth: self.auth.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn api_router<L>(state: AppState<L>) -> Router<()>
where
  L: AnswerLog + 'static,
{
  let auth = state.auth.clone();

  let router = Router::new()
    // Rating loop
    .route("/display", get(rating::display::<L>))
    .route("/progress", get(rating::progress::<L>))
    .route("/submit", post(rating::submit::<L>))
    .route("/skip", post(rating::skip::<L>))
    // Catalog
    .route("/catalog/retire", post(catalog::retire::<L>))
    .route("/catalog/reinstate", post(catalog::reinstate::<L>))
    .route("/catalog/extend", post(catalog::extend::<L>))
    .with_state(state);

  let router = match auth {
    Some(cfg) => router.layer(middleware::from_fn_with_state(cfg, auth::require_basic_auth)),
    None => router,
  };
  router.layer(TraceLayer::new_for_http())
}
