//! Points configuration routes

use axum::{extract::State, Json};
use common::models::{LevelThresholds, PointsBounds, PointsConfig};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ConfigResponse {
    pub system_default: PointsConfig,
    pub bounds: PointsBounds,
}

#[derive(Serialize)]
pub struct OrganizationsResponse {
    pub organizations: Vec<String>,
}

/// System default points configuration and bounds
pub async fn get(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let calculator = state.catalog.calculator();
    Json(ConfigResponse {
        system_default: calculator.system_default().clone(),
        bounds: calculator.bounds(),
    })
}

/// Organizations with their own points configuration
pub async fn organizations(State(state): State<Arc<AppState>>) -> Json<OrganizationsResponse> {
    Json(OrganizationsResponse {
        organizations: state.catalog.organizations().map(str::to_string).collect(),
    })
}

/// Level threshold table
pub async fn levels(State(state): State<Arc<AppState>>) -> Json<LevelThresholds> {
    Json(state.catalog.levels().clone())
}
