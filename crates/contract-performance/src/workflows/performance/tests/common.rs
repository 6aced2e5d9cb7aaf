use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::performance::{
    Contract, NormalizedContract, PerformanceEngine, PolicyVersion, RateTable, ScoringDefaults,
};

pub(super) const RATE_TABLE_CSV: &str = "\
보험사,유형,납입기간조건,컨벤션율,썸머율
한화생명,생명보험,10년 미만,150,100
한화생명,생명보험,10년 이상,150,150
삼성화재,손해보험,10년 미만,250,100
삼성화재,손해보험,10년 이상,250,200
기타생보,생명보험,10년 미만,50,30
기타생보,생명보험,10년 이상,100,100
";

pub(super) const CONTRACTS_CSV: &str = "\
보험사,상품명,납입기간,보험료,지분율,납입방법,상품군,계약상태,수금자,계약일
삼성화재,든든건강보험,12,1000000,50%,월납,보장성,정상,김민준,2024-03-02
한화생명,행복연금보험,20,500000,100,월납,연금,정상,이서연,2024-03-05
";

pub(super) fn rate_table() -> RateTable {
    RateTable::from_reader(RATE_TABLE_CSV.as_bytes()).expect("rate table parses")
}

pub(super) fn engine(version: PolicyVersion) -> PerformanceEngine {
    PerformanceEngine::for_version(version, Some(rate_table())).expect("policy builds")
}

/// Fully populated contract for the manager-score policy at full share.
pub(super) fn manager_contract(
    insurer: &str,
    term_years: u32,
    premium: i64,
    collector: &str,
) -> Contract {
    Contract::new(insurer, term_years, premium)
        .with_share_ratio(100)
        .with_payment_method("월납")
        .with_product_group("보장성")
        .with_contract_status("정상")
        .with_collector(collector)
}

pub(super) fn normalized(
    payment_method: &str,
    product_group: &str,
    contract_status: &str,
) -> NormalizedContract {
    NormalizedContract {
        row: 1,
        insurer: "삼성화재".to_string(),
        product_name: Some("든든건강보험".to_string()),
        payment_term_years: 20,
        premium: 100_000.0,
        share_ratio: 100.0,
        payment_method: payment_method.to_string(),
        product_group: product_group.to_string(),
        contract_status: contract_status.to_string(),
        collector_name: Some("김민준".to_string()),
        contract_date: None,
    }
}

pub(super) fn defaults(policy: PolicyVersion) -> Arc<ScoringDefaults> {
    Arc::new(ScoringDefaults::new(policy))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("valid json")
}
