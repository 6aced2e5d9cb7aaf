use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use contract_performance::workflows::performance::{
    performance_router, PolicyVersion, ScoringDefaults,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct PolicyDescriptor {
    pub(crate) key: &'static str,
    pub(crate) label: &'static str,
    pub(crate) dimensions: Vec<&'static str>,
    pub(crate) applies_exclusions: bool,
    pub(crate) groups_by_collector: bool,
    pub(crate) default: bool,
}

pub(crate) fn with_performance_routes(defaults: Arc<ScoringDefaults>) -> axum::Router {
    let default_policy = defaults.policy;

    performance_router(defaults)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/performance/policies",
            axum::routing::get(move || policies_endpoint(default_policy)),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn policies_endpoint(default_policy: PolicyVersion) -> Json<Vec<PolicyDescriptor>> {
    let policies = PolicyVersion::ordered()
        .into_iter()
        .map(|policy| PolicyDescriptor {
            key: policy.key(),
            label: policy.label(),
            dimensions: policy
                .dimensions()
                .iter()
                .map(|dimension| dimension.label())
                .collect(),
            applies_exclusions: policy.applies_exclusions(),
            groups_by_collector: policy.groups_by_collector(),
            default: policy == default_policy,
        })
        .collect();

    Json(policies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_performance_routes(Arc::new(ScoringDefaults::new(PolicyVersion::ManagerScore)))
            .layer(Extension(state))
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&body).expect("valid json")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_waits_for_listener() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(response).await["status"], json!("initializing"));
    }

    #[tokio::test]
    async fn policies_lists_every_version_and_marks_default() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/performance/policies")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let policies = payload.as_array().expect("array payload");
        assert_eq!(policies.len(), 4);
        let defaults: Vec<&Value> = policies
            .iter()
            .filter(|policy| policy["default"] == json!(true))
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0]["key"], json!("manager-score"));
        assert_eq!(defaults[0]["dimensions"], json!(["매니저점수"]));
    }

    #[tokio::test]
    async fn score_route_is_mounted() {
        let request = json!({
            "contracts_csv": "보험사,납입기간,보험료,지분율,납입방법,상품군,계약상태,수금자\n삼성화재,12,1000000,50,월납,보장성,정상,김민준\n",
        });

        let response = app(true)
            .oneshot(
                Request::post("/api/v1/performance/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["total"]["converted"][0]["amount"], json!(750_000));
    }
}
