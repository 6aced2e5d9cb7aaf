use super::classifier::{RateKey, RatePolicy};
use super::domain::{AppliedRate, NormalizedContract, ScoredContract};

/// Premium credited to the collector: `premium × share / 100`.
pub fn performance_premium(premium: f64, share_ratio: f64) -> f64 {
    premium * (share_ratio / 100.0)
}

/// Converted amount for one rate dimension: `performance × rate / 100`.
pub fn converted_amount(performance_premium: f64, rate: u32) -> f64 {
    performance_premium * f64::from(rate) / 100.0
}

/// Scores one eligible contract. The rate-table key is returned when the
/// policy had no row for it.
pub(crate) fn score_contract(
    policy: &dyn RatePolicy,
    contract: NormalizedContract,
) -> (ScoredContract, Option<RateKey>) {
    let classification = policy.classify(
        &contract.insurer,
        contract.payment_term_years,
        contract.product_name.as_deref(),
    );
    let performance = performance_premium(contract.premium, contract.share_ratio);
    let rates = classification
        .rates
        .iter()
        .map(|entry| AppliedRate {
            dimension: entry.dimension,
            rate: entry.rate,
            converted_amount: converted_amount(performance, entry.rate),
        })
        .collect();

    let scored = ScoredContract {
        contract,
        category: classification.category,
        performance_premium: performance,
        rates,
    };
    (scored, classification.table_gap)
}
