//! Point calculation routes

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use common::models::{Activity, ActivityType, LevelProgress, PointsCalculation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CalculateRequest {
    pub activity_type: ActivityType,
    #[serde(default)]
    pub is_ai_generated: bool,
    /// Organization whose configuration applies (system default if absent)
    pub org: Option<String>,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub activities: Vec<Activity>,
    pub org: Option<String>,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub calculations: Vec<PointsCalculation>,
    pub total_points: i64,
    pub level_progress: LevelProgress,
    pub calculated_at: DateTime<Utc>,
}

/// Score a single activity
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CalculateRequest>,
) -> ApiResult<Json<PointsCalculation>> {
    let config = state.catalog.config_for(req.org.as_deref())?;
    let calculation = state.catalog.calculator().calculate(
        req.activity_type,
        req.is_ai_generated,
        Some(config),
    )?;

    Ok(Json(calculation))
}

/// Score a list of activities and place their sum on the level table
pub async fn batch(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BatchRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let config = state.catalog.config_for(req.org.as_deref())?;
    let calculator = state.catalog.calculator();

    let calculations = req
        .activities
        .iter()
        .map(|a| calculator.calculate(a.activity_type, a.is_ai_generated, Some(config)))
        .collect::<Result<Vec<_>, _>>()?;

    let total_points = calculations
        .iter()
        .try_fold(0i64, |sum, c| sum.checked_add(c.final_points))
        .ok_or_else(|| ApiError::InvalidArgument("total points overflow".to_string()))?;

    let level_progress = processor::calculate_level_progress(total_points, state.catalog.levels())?;

    info!(
        "Scored {} activities for {}: {} points, level {}",
        calculations.len(),
        req.org.as_deref().unwrap_or("system default"),
        total_points,
        level_progress.current_level
    );

    Ok(Json(BatchResponse {
        calculations,
        total_points,
        level_progress,
        calculated_at: Utc::now(),
    }))
}
