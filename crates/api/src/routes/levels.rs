//! Level progress routes

use axum::{extract::State, Json};
use common::models::LevelProgress;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProgressQuery {
    pub total_points: i64,
}

pub async fn progress(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> ApiResult<Json<LevelProgress>> {
    let progress = processor::calculate_level_progress(query.total_points, state.catalog.levels())?;
    Ok(Json(progress))
}
