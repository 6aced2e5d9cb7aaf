use super::super::classifier::PolicyVersion;
use super::super::domain::{
    AppliedRate, DimensionTotal, ExclusionRecord, GroupSummary, PerformanceWarning,
    ScoredContract,
};
use super::views::{
    round_won, AppliedRateView, DimensionTotalView, ExclusionView, GroupSummaryView,
    PerformanceSummaryView, ScoredContractView, WarningCounts,
};
use serde::Serialize;

/// Complete, unrounded result of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub policy: PolicyVersion,
    pub scored: Vec<ScoredContract>,
    pub excluded: Vec<ExclusionRecord>,
    /// Per-collector groups in rank order; empty when the policy has no collectors.
    pub groups: Vec<GroupSummary>,
    pub total: GroupSummary,
    pub warnings: Vec<PerformanceWarning>,
}

impl PerformanceReport {
    pub fn unparseable_date_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, PerformanceWarning::UnparseableDate { .. }))
            .count()
    }

    pub fn defaulted_term_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, PerformanceWarning::DefaultedPaymentTerm { .. }))
            .count()
    }

    pub fn rate_table_gap_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, PerformanceWarning::RateTableGap { .. }))
            .count()
    }

    pub fn warning_counts(&self) -> WarningCounts {
        WarningCounts {
            unparseable_dates: self.unparseable_date_count(),
            defaulted_payment_terms: self.defaulted_term_count(),
            rate_table_gaps: self.rate_table_gap_count(),
        }
    }

    /// Collector groups ordered by contract count, largest first.
    pub fn top_by_count(&self, limit: usize) -> Vec<&GroupSummary> {
        let mut groups: Vec<&GroupSummary> = self.groups.iter().collect();
        groups.sort_by(|a, b| {
            a.count_rank
                .cmp(&b.count_rank)
                .then_with(|| a.amount_rank.cmp(&b.amount_rank))
                .then_with(|| a.collector.cmp(&b.collector))
        });
        groups.truncate(limit);
        groups
    }

    pub fn summary(&self) -> PerformanceSummaryView {
        PerformanceSummaryView {
            policy: self.policy,
            policy_label: self.policy.label(),
            contracts: self.scored.iter().map(contract_view).collect(),
            excluded: self.excluded.iter().map(exclusion_view).collect(),
            collectors: self.groups.iter().map(group_view).collect(),
            total: group_view(&self.total),
            warnings: self.warning_counts(),
        }
    }
}

fn rate_view(rate: &AppliedRate) -> AppliedRateView {
    AppliedRateView {
        dimension: rate.dimension,
        dimension_label: rate.dimension.label(),
        rate: rate.rate,
        converted_amount: round_won(rate.converted_amount),
    }
}

fn contract_view(scored: &ScoredContract) -> ScoredContractView {
    let contract = &scored.contract;
    ScoredContractView {
        row: contract.row,
        insurer: contract.insurer.clone(),
        category_label: scored.category.label(),
        line: scored.category.line(),
        payment_term_years: contract.payment_term_years,
        premium: round_won(contract.premium),
        share_ratio: contract.share_ratio,
        performance_premium: round_won(scored.performance_premium),
        rates: scored.rates.iter().map(rate_view).collect(),
        collector_name: contract.collector_name.clone(),
        contract_date: contract.contract_date,
    }
}

fn exclusion_view(record: &ExclusionRecord) -> ExclusionView {
    ExclusionView {
        row: record.contract.row,
        insurer: record.contract.insurer.clone(),
        collector_name: record.contract.collector_name.clone(),
        premium: round_won(record.contract.premium),
        reason: record.reason.clone(),
    }
}

fn total_view(total: &DimensionTotal) -> DimensionTotalView {
    DimensionTotalView {
        dimension: total.dimension,
        dimension_label: total.dimension.label(),
        amount: round_won(total.amount),
    }
}

fn group_view(group: &GroupSummary) -> GroupSummaryView {
    GroupSummaryView {
        label: group.label().to_string(),
        contract_count: group.contract_count,
        performance_premium: round_won(group.performance_premium_sum),
        converted: group.converted_sums.iter().map(total_view).collect(),
        amount_rank: group.amount_rank,
        count_rank: group.count_rank,
    }
}
