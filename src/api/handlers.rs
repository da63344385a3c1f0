use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{ComparisonReport, RandomPickReport, Title, Username};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct OverlapParams {
    /// Comma-separated usernames or watchlist URLs, 2-4 entries
    pub users: String,
}

#[derive(Debug, Serialize)]
pub struct OverlapResponse {
    pub users: Vec<Username>,
    pub common: Vec<Title>,
    pub count: usize,
    /// Users whose scrape truncated; an empty overlap including one of
    /// these may not reflect their real watchlist
    pub incomplete: Vec<Username>,
}

impl From<ComparisonReport> for OverlapResponse {
    fn from(report: ComparisonReport) -> Self {
        Self {
            users: report.usernames,
            count: report.common.len(),
            common: report.common,
            incomplete: report.incomplete,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RandomPickResponse {
    pub users: Vec<Username>,
    pub pick: Option<Title>,
    pub incomplete: Vec<Username>,
}

impl From<RandomPickReport> for RandomPickResponse {
    fn from(report: RandomPickReport) -> Self {
        Self {
            users: report.usernames,
            pick: report.pick,
            incomplete: report.incomplete,
        }
    }
}

fn split_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// List the movies common to every requested user's watchlist
pub async fn get_overlap(
    State(state): State<AppState>,
    Query(params): Query<OverlapParams>,
) -> AppResult<Json<OverlapResponse>> {
    let users = split_users(&params.users);
    let report = state.comparison.compare(&users).await?;
    Ok(Json(report.into()))
}

/// Pick one random movie from the common watchlist
pub async fn get_random_pick(
    State(state): State<AppState>,
    Query(params): Query<OverlapParams>,
) -> AppResult<Json<RandomPickResponse>> {
    let users = split_users(&params.users);
    let report = state.comparison.random_common(&users).await?;
    Ok(Json(report.into()))
}
