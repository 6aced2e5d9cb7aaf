use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::classifier::{PolicyVersion, RateTable};
use super::report::views::PerformanceSummaryView;
use super::{PerformanceEngine, PerformanceError};
use crate::workflows::contracts::ContractImporter;

/// Server-side fallbacks for requests that omit the policy or rate table.
#[derive(Debug, Clone)]
pub struct ScoringDefaults {
    pub policy: PolicyVersion,
    pub rate_table: Option<RateTable>,
}

impl ScoringDefaults {
    pub fn new(policy: PolicyVersion) -> Self {
        Self {
            policy,
            rate_table: None,
        }
    }

    pub fn with_rate_table(mut self, table: RateTable) -> Self {
        self.rate_table = Some(table);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub policy: Option<String>,
    pub contracts_csv: String,
    #[serde(default)]
    pub rate_table_csv: Option<String>,
    /// Per-contract rows are left out of the response unless requested.
    #[serde(default)]
    pub include_contracts: bool,
}

/// Router builder exposing the scoring endpoint.
pub fn performance_router(defaults: Arc<ScoringDefaults>) -> Router {
    Router::new()
        .route("/api/v1/performance/score", post(score_handler))
        .with_state(defaults)
}

/// Runs one request end to end: import, policy selection, scoring, summary.
pub fn score_request(
    defaults: &ScoringDefaults,
    request: ScoreRequest,
) -> Result<PerformanceSummaryView, PerformanceError> {
    let version = match request.policy.as_deref() {
        Some(raw) => raw.parse::<PolicyVersion>()?,
        None => defaults.policy,
    };

    let rate_table = match request.rate_table_csv.as_deref() {
        Some(csv) => Some(RateTable::from_reader(csv.as_bytes())?),
        None => defaults.rate_table.clone(),
    };

    let contracts = ContractImporter::from_reader(request.contracts_csv.as_bytes())?;
    let engine = PerformanceEngine::for_version(version, rate_table)?;
    let report = engine.run(&contracts)?;

    let mut summary = report.summary();
    if !request.include_contracts {
        summary.contracts.clear();
    }
    Ok(summary)
}

pub(crate) async fn score_handler(
    State(defaults): State<Arc<ScoringDefaults>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response {
    match score_request(&defaults, request) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(PerformanceError::Validation(error)) => {
            warn!(%error, "score request failed validation");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            warn!(error = %other, "score request rejected");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}
