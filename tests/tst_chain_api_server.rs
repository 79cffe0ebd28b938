mod helpers;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::Router;
use helpers::{StubProvider, contract};
use options_dashboard::chain::chain_api_server::{AppState, build_router};
use serde_json::Value;
use tower::ServiceExt;

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Router {
        let provider = StubProvider::new()
            .with_chain("2025-01-10", vec![contract(100.0, 0.0, 0.0)], vec![])
            .with_chain(
                "2025-01-17",
                vec![contract(100.0, 30.0, 5.0)],
                vec![contract(100.0, 50.0, 2.0)],
            );
        build_router(AppState::new(provider))
    }

    async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_expirations_lists_valid_dates() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/api/expirations?ticker=aapl").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["ticker"], "AAPL");
        assert_eq!(body["data"]["expirations"], serde_json::json!(["2025-01-17"]));
        assert!(body["processing_time_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_warning_uses_failure_envelope() {
        let app = build_router(AppState::new(StubProvider::failing()));
        let (_, body) = call(&app, Method::GET, "/api/expirations?ticker=AAPL").await;

        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "No valid expiration dates found for AAPL");
    }

    #[tokio::test]
    async fn test_select_fetch_plot_flow() {
        let app = app();
        call(&app, Method::GET, "/api/expirations?ticker=AAPL").await;

        let (_, body) = call(&app, Method::POST, "/api/select?expiration=2025-01-10").await;
        assert_eq!(body["success"], false);

        let (_, body) = call(&app, Method::POST, "/api/select?expiration=2025-01-17").await;
        assert_eq!(body["data"]["state"], "idle");

        let (_, body) = call(&app, Method::POST, "/api/fetch").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["rows"], 2);
        assert_eq!(body["data"]["total_open_interest"], 80);
        assert_eq!(body["data"]["table"]["rows"][1]["option_type"], "Put");

        let (_, body) = call(&app, Method::GET, "/api/plot?kind=change-in-oi").await;
        assert_eq!(body["data"]["kind"], "change-in-oi");
        assert_eq!(body["data"]["points"][1]["value"], 20);
        assert_eq!(body["data"]["palette"]["call"], "green");

        let (_, body) = call(&app, Method::GET, "/api/plot?kind=pie").await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unknown plot kind: 'pie'");

        let (_, body) = call(&app, Method::GET, "/api/state").await;
        assert_eq!(body["data"]["state"], "ready");
        assert_eq!(body["data"]["ticker"], "AAPL");
    }

    #[tokio::test]
    async fn test_plot_before_fetch_is_not_ready() {
        let app = app();
        let (_, body) = call(&app, Method::GET, "/api/plot").await;

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Options data has not been fetched yet");
    }

    #[tokio::test]
    async fn test_export_downloads_csv() {
        let app = app();
        call(&app, Method::GET, "/api/expirations?ticker=AAPL").await;
        call(&app, Method::POST, "/api/fetch").await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/export").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"AAPL_options.csv\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.starts_with("contractSymbol,lastTradeDate,strike"));
        assert_eq!(body.lines().count(), 3);
    }
}
