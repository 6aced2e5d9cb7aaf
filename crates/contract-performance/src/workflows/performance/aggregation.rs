use super::domain::{GroupSummary, RateDimension, ScoredContract};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Aggregation {
    pub(crate) groups: Vec<GroupSummary>,
    pub(crate) total: GroupSummary,
}

fn accumulate(group: &mut GroupSummary, contract: &ScoredContract) {
    group.contract_count += 1;
    group.performance_premium_sum += contract.performance_premium;
    for total in &mut group.converted_sums {
        total.amount += contract.converted_amount(total.dimension);
    }
}

/// Rolls eligible contracts into the total group and, when requested, one
/// group per collector. Sums run in input order.
pub(crate) fn aggregate(
    scored: &[ScoredContract],
    dimensions: &[RateDimension],
    by_collector: bool,
) -> Aggregation {
    let mut total = GroupSummary::empty(None, dimensions);
    let mut collectors: BTreeMap<String, GroupSummary> = BTreeMap::new();

    for contract in scored {
        accumulate(&mut total, contract);

        if by_collector {
            let name = contract.contract.collector_name.clone().unwrap_or_default();
            let group = collectors
                .entry(name.clone())
                .or_insert_with(|| GroupSummary::empty(Some(name), dimensions));
            accumulate(group, contract);
        }
    }

    let mut groups: Vec<GroupSummary> = collectors.into_values().collect();
    assign_ranks(&mut groups);

    Aggregation { groups, total }
}

/// Dense ranks, largest value first. Equal values share a rank.
pub(crate) fn dense_rank<T: Copy>(values: &[T], compare: impl Fn(&T, &T) -> Ordering) -> Vec<u32> {
    let mut distinct: Vec<T> = values.to_vec();
    distinct.sort_by(|a, b| compare(b, a));
    distinct.dedup_by(|a, b| compare(a, b) == Ordering::Equal);

    values
        .iter()
        .map(|value| {
            // `distinct` is descending, so the comparison runs reversed.
            let position = distinct
                .binary_search_by(|candidate| compare(value, candidate))
                .unwrap_or_else(|insert_at| insert_at);
            position as u32 + 1
        })
        .collect()
}

fn assign_ranks(groups: &mut [GroupSummary]) {
    let amounts: Vec<f64> = groups.iter().map(GroupSummary::primary_sum).collect();
    let counts: Vec<usize> = groups.iter().map(|group| group.contract_count).collect();

    let amount_ranks = dense_rank(&amounts, |a, b| a.total_cmp(b));
    let count_ranks = dense_rank(&counts, |a, b| a.cmp(b));

    for ((group, amount_rank), count_rank) in groups.iter_mut().zip(amount_ranks).zip(count_ranks) {
        group.amount_rank = Some(amount_rank);
        group.count_rank = Some(count_rank);
    }

    groups.sort_by(|a, b| {
        a.amount_rank
            .cmp(&b.amount_rank)
            .then_with(|| b.contract_count.cmp(&a.contract_count))
            .then_with(|| a.collector.cmp(&b.collector))
    });
}
