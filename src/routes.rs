//! HTTP API routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::analyzer::Analyzer;
use crate::cache::ResultCache;
use crate::compare::compare;
use crate::ecfr::SnapshotSource;
use crate::error::AppError;
use crate::keywords::{keyword_frequencies, parse_keyword_list, KeywordFrequencies};
use crate::stats::{ComparisonResult, Snapshot};

pub const DEFAULT_DATE: &str = "2025-01-01";
pub const DEFAULT_COMPARE_FROM: &str = "2022-01-01";
pub const DEFAULT_COMPARE_TO: &str = "2023-01-01";
pub const DEFAULT_TITLE: &str = "1";
pub const MAX_TITLE: u32 = 50;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SnapshotSource>,
    pub analyzer: Arc<Analyzer>,
    pub cache: ResultCache,
}

impl AppState {
    pub fn new(source: Arc<dyn SnapshotSource>, analyzer: Analyzer) -> Self {
        Self {
            source,
            analyzer: Arc::new(analyzer),
            cache: ResultCache::new(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", get(analyze))
        .route("/latest_analyze", get(latest_analyze))
        .route("/compare", get(compare_snapshots))
        .route("/keyword_search", get(keyword_search))
        .route("/results", get(results))
        .with_state(state)
}

// ============ Parameters ============

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub date: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestParams {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    pub date1: Option<String>,
    pub date2: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordParams {
    pub date: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
}

pub fn parse_date(raw: Option<&str>, default: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(default);
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidParameter(format!("date '{}' is not in YYYY-MM-DD format", raw))
    })
}

pub fn parse_title(raw: Option<&str>) -> Result<u32, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TITLE);
    match raw.parse::<u32>() {
        Ok(title) if (1..=MAX_TITLE).contains(&title) => Ok(title),
        _ => Err(AppError::InvalidParameter(format!(
            "title '{}' must be a number between 1 and {}",
            raw, MAX_TITLE
        ))),
    }
}

// ============ Responses ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis_result: Snapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub success: bool,
    pub snapshot_a: Snapshot,
    pub snapshot_b: Snapshot,
    pub comparison: ComparisonResult,
}

#[derive(Debug, Serialize)]
pub struct KeywordSearchResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub title: u32,
    #[serde(flatten)]
    pub result: KeywordFrequencies,
}

// ============ Handlers ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ecfr-analyzer",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Fetches and analyzes one snapshot off the async runtime.
async fn analyze_snapshot(
    state: &AppState,
    date: NaiveDate,
    title: u32,
) -> Result<Snapshot, AppError> {
    let text = state.source.fetch_snapshot(date, title).await?;
    let analyzer = Arc::clone(&state.analyzer);
    let analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&text))
        .await
        .map_err(|e| AppError::Internal(format!("analysis task failed: {}", e)))?;
    Ok(Snapshot {
        date,
        title,
        analysis,
    })
}

async fn analyze(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeParams>, QueryRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Query(params) = query?;
    let start_time = Instant::now();
    let date = parse_date(params.date.as_deref(), DEFAULT_DATE)?;
    let title = parse_title(params.title.as_deref())?;

    let snapshot = analyze_snapshot(&state, date, title).await?;
    state.cache.store(snapshot.clone()).await;

    info!(
        action = "complete",
        component = "analyze",
        title,
        date = %date,
        word_count = snapshot.analysis.word_count,
        duration_ms = start_time.elapsed().as_millis(),
        "Snapshot analyzed"
    );
    Ok(Json(AnalysisResponse {
        success: true,
        analysis_result: snapshot,
    }))
}

async fn latest_analyze(
    State(state): State<AppState>,
    query: Result<Query<LatestParams>, QueryRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Query(params) = query?;
    let start_time = Instant::now();
    let title = parse_title(params.title.as_deref())?;
    let date = state.source.latest_snapshot_date(title).await?;

    let snapshot = analyze_snapshot(&state, date, title).await?;
    state.cache.store(snapshot.clone()).await;

    info!(
        action = "complete",
        component = "latest_analyze",
        title,
        date = %date,
        word_count = snapshot.analysis.word_count,
        duration_ms = start_time.elapsed().as_millis(),
        "Latest snapshot analyzed"
    );
    Ok(Json(AnalysisResponse {
        success: true,
        analysis_result: snapshot,
    }))
}

async fn compare_snapshots(
    State(state): State<AppState>,
    query: Result<Query<CompareParams>, QueryRejection>,
) -> Result<Json<CompareResponse>, AppError> {
    let Query(params) = query?;
    let start_time = Instant::now();
    let date1 = parse_date(params.date1.as_deref(), DEFAULT_COMPARE_FROM)?;
    let date2 = parse_date(params.date2.as_deref(), DEFAULT_COMPARE_TO)?;
    let title = parse_title(params.title.as_deref())?;

    let (snapshot_a, snapshot_b) = tokio::try_join!(
        analyze_snapshot(&state, date1, title),
        analyze_snapshot(&state, date2, title)
    )?;
    let comparison = compare(&snapshot_a.analysis, &snapshot_b.analysis);

    info!(
        action = "complete",
        component = "compare",
        title,
        date1 = %date1,
        date2 = %date2,
        word_count_delta = comparison.word_count_delta,
        duration_ms = start_time.elapsed().as_millis(),
        "Snapshots compared"
    );
    Ok(Json(CompareResponse {
        success: true,
        snapshot_a,
        snapshot_b,
        comparison,
    }))
}

async fn keyword_search(
    State(state): State<AppState>,
    query: Result<Query<KeywordParams>, QueryRejection>,
) -> Result<Json<KeywordSearchResponse>, AppError> {
    let Query(params) = query?;
    let start_time = Instant::now();
    let date = parse_date(params.date.as_deref(), DEFAULT_DATE)?;
    let title = parse_title(params.title.as_deref())?;
    let keywords = parse_keyword_list(params.keywords.as_deref().unwrap_or_default());

    let text = state.source.fetch_snapshot(date, title).await?;
    let result = tokio::task::spawn_blocking(move || keyword_frequencies(&text, &keywords))
        .await
        .map_err(|e| AppError::Internal(format!("keyword search task failed: {}", e)))?;

    info!(
        action = "complete",
        component = "keyword_search",
        title,
        date = %date,
        keyword_count = result.keywords.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Keyword search completed"
    );
    Ok(Json(KeywordSearchResponse {
        success: true,
        date,
        title,
        result,
    }))
}

async fn results(State(state): State<AppState>) -> Result<Json<AnalysisResponse>, AppError> {
    let snapshot = state.cache.retrieve().await.ok_or(AppError::NoCachedResult)?;
    Ok(Json(AnalysisResponse {
        success: true,
        analysis_result: snapshot,
    }))
}
