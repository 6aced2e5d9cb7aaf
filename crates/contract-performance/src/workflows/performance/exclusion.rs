use super::domain::{ExclusionReason, ExclusionRecord, NormalizedContract};

const LUMP_SUM_MARKERS: &[&str] = &["일시납"];
const PENSION_OR_SAVINGS_MARKERS: &[&str] = &["연금", "저축"];
const TERMINATED_STATUS_MARKERS: &[&str] = &["철회", "취소", "실효"];

pub const REASON_SEPARATOR: &str = " / ";
pub const UNKNOWN_REASON_LABEL: &str = "사유 불명";

fn contains_any(value: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| value.contains(marker))
}

impl ExclusionReason {
    /// Tests this reason's marker against its own field only.
    pub fn matches(self, contract: &NormalizedContract) -> bool {
        match self {
            ExclusionReason::LumpSum => is_lump_sum(contract),
            ExclusionReason::PensionOrSavings => is_pension_or_savings(contract),
            ExclusionReason::Terminated => is_terminated(contract),
        }
    }
}

pub fn is_lump_sum(contract: &NormalizedContract) -> bool {
    contains_any(&contract.payment_method, LUMP_SUM_MARKERS)
}

pub fn is_pension_or_savings(contract: &NormalizedContract) -> bool {
    contains_any(&contract.product_group, PENSION_OR_SAVINGS_MARKERS)
}

pub fn is_terminated(contract: &NormalizedContract) -> bool {
    contains_any(&contract.contract_status, TERMINATED_STATUS_MARKERS)
}

/// Routing predicate: excluded when any marker is present.
pub fn is_excluded(contract: &NormalizedContract) -> bool {
    is_lump_sum(contract) || is_pension_or_savings(contract) || is_terminated(contract)
}

/// Re-tests every reason independently so simultaneous reasons are all reported.
pub fn exclusion_reasons(contract: &NormalizedContract) -> Vec<ExclusionReason> {
    ExclusionReason::ordered()
        .into_iter()
        .filter(|reason| reason.matches(contract))
        .collect()
}

pub fn describe_reasons(reasons: &[ExclusionReason]) -> String {
    if reasons.is_empty() {
        return UNKNOWN_REASON_LABEL.to_string();
    }
    reasons
        .iter()
        .map(|reason| reason.label())
        .collect::<Vec<_>>()
        .join(REASON_SEPARATOR)
}

pub(crate) fn exclusion_record(contract: NormalizedContract) -> ExclusionRecord {
    let reasons = exclusion_reasons(&contract);
    let reason = describe_reasons(&reasons);
    ExclusionRecord {
        contract,
        reasons,
        reason,
    }
}

#[derive(Debug, Default)]
pub(crate) struct ExclusionSplit {
    pub(crate) eligible: Vec<NormalizedContract>,
    pub(crate) excluded: Vec<ExclusionRecord>,
}

pub(crate) fn split(contracts: Vec<NormalizedContract>) -> ExclusionSplit {
    let mut split = ExclusionSplit::default();
    for contract in contracts {
        if is_excluded(&contract) {
            split.excluded.push(exclusion_record(contract));
        } else {
            split.eligible.push(contract);
        }
    }
    split
}
