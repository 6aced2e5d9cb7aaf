use super::super::classifier::PolicyVersion;
use super::super::domain::{InsuranceLine, RateDimension};
use chrono::NaiveDate;
use serde::Serialize;

/// Rounds to whole won, half away from zero. Only used for presentation.
pub fn round_won(amount: f64) -> i64 {
    amount.round() as i64
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedRateView {
    pub dimension: RateDimension,
    pub dimension_label: &'static str,
    pub rate: u32,
    pub converted_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredContractView {
    pub row: usize,
    pub insurer: String,
    pub category_label: String,
    pub line: InsuranceLine,
    pub payment_term_years: u32,
    pub premium: i64,
    pub share_ratio: f64,
    pub performance_premium: i64,
    pub rates: Vec<AppliedRateView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExclusionView {
    pub row: usize,
    pub insurer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector_name: Option<String>,
    pub premium: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionTotalView {
    pub dimension: RateDimension,
    pub dimension_label: &'static str,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummaryView {
    pub label: String,
    pub contract_count: usize,
    pub performance_premium: i64,
    pub converted: Vec<DimensionTotalView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_rank: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarningCounts {
    pub unparseable_dates: usize,
    pub defaulted_payment_terms: usize,
    pub rate_table_gaps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummaryView {
    pub policy: PolicyVersion,
    pub policy_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contracts: Vec<ScoredContractView>,
    pub excluded: Vec<ExclusionView>,
    pub collectors: Vec<GroupSummaryView>,
    pub total: GroupSummaryView,
    pub warnings: WarningCounts,
}
