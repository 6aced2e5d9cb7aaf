use contract_performance::config::ScoringConfig;
use contract_performance::error::AppError;
use contract_performance::workflows::performance::{
    PerformanceError, PolicyVersion, RateTable, ScoringDefaults,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_rate_table(path: &Path) -> Result<RateTable, AppError> {
    let table = RateTable::from_path(path).map_err(PerformanceError::from)?;
    info!(path = %path.display(), rows = table.len(), "rate table loaded");
    Ok(table)
}

/// Server-side scoring defaults; the rate table is read once at startup.
pub(crate) fn scoring_defaults(config: &ScoringConfig) -> Result<ScoringDefaults, AppError> {
    let mut defaults = ScoringDefaults::new(config.policy);
    if let Some(path) = &config.rate_table_path {
        defaults = defaults.with_rate_table(load_rate_table(path)?);
    }
    Ok(defaults)
}

pub(crate) fn parse_policy(raw: &str) -> Result<PolicyVersion, String> {
    raw.parse::<PolicyVersion>().map_err(|err| err.to_string())
}

/// Whole won with thousands separators, e.g. `-1,234,567`.
pub(crate) fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
