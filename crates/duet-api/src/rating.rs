//! Handlers for the rating loop.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/display` | The pair to rate, or `done` |
//! | `GET`  | `/progress` | Global and anchor progress |
//! | `POST` | `/submit` | Body: `{"score": 1..5}`; returns the next display |
//! | `POST` | `/skip` | Returns the next display; nothing is recorded |

use axum::{Json, extract::State};
use duet_core::{
  catalog::Item,
  log::AnswerLog,
  remaining::Progress,
  scheduler::SchedulerState,
  session::Presentation,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Display ──────────────────────────────────────────────────────────────────

/// `GET /display`
pub async fn display<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
) -> Json<Presentation> {
  let session = state.session.lock().await;
  Json(session.current_display())
}

// ─── Progress ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressBody {
  pub state:           SchedulerState,
  pub global:          Progress,
  /// `global.answered / global.total`, 0 when there is nothing to rate.
  pub ratio:           f64,
  pub anchor:          Option<Item>,
  pub anchor_progress: Option<Progress>,
}

/// `GET /progress`
pub async fn progress<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
) -> Json<ProgressBody> {
  let session = state.session.lock().await;
  let global = session.global_progress();
  let anchor = match session.state() {
    SchedulerState::AnchorActive(item) => Some(item),
    _ => None,
  };
  Json(ProgressBody {
    state: session.state(),
    global,
    ratio: global.ratio(),
    anchor,
    anchor_progress: session.anchor_progress(),
  })
}

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub score: i64,
}

/// `POST /submit`: 400 on an out-of-range score, 409 when nothing is
/// displayed, 503 when the log cannot be written.
pub async fn submit<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
  Json(body): Json<SubmitBody>,
) -> Result<Json<Presentation>, ApiError> {
  let mut session = state.session.lock().await;
  session.submit(body.score).await?;
  Ok(Json(session.current_display()))
}

// ─── Skip ─────────────────────────────────────────────────────────────────────

/// `POST /skip`
pub async fn skip<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
) -> Json<Presentation> {
  let mut session = state.session.lock().await;
  session.skip();
  Json(session.current_display())
}
