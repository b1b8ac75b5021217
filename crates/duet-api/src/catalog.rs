//! Handlers for `/catalog` endpoints.
//!
//! Each takes `{"items": [...]}` and answers with the items whose status
//! actually changed plus the display after recomputation. Unknown names are
//! ignored.

use axum::{Json, extract::State};
use duet_core::{catalog::Item, log::AnswerLog, session::Presentation};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ItemsBody {
  pub items: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogChange {
  pub changed: Vec<Item>,
  pub display: Presentation,
}

/// `POST /catalog/retire`
pub async fn retire<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
  Json(body): Json<ItemsBody>,
) -> Result<Json<CatalogChange>, ApiError> {
  let mut session = state.session.lock().await;
  let changed = session.on_catalog_change(body.items).await?;
  Ok(Json(CatalogChange { changed, display: session.current_display() }))
}

/// `POST /catalog/reinstate`
pub async fn reinstate<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
  Json(body): Json<ItemsBody>,
) -> Result<Json<CatalogChange>, ApiError> {
  let mut session = state.session.lock().await;
  let changed = session.reinstate(body.items).await?;
  Ok(Json(CatalogChange { changed, display: session.current_display() }))
}

/// `POST /catalog/extend`
pub async fn extend<L: AnswerLog + 'static>(
  State(state): State<AppState<L>>,
  Json(body): Json<ItemsBody>,
) -> Result<Json<CatalogChange>, ApiError> {
  let mut session = state.session.lock().await;
  let changed = session.extend(body.items).await?;
  Ok(Json(CatalogChange { changed, display: session.current_display() }))
}
