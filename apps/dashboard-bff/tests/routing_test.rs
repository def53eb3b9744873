//! # ルーティング統合テスト
//!
//! `build_app` が組み立てたルーター全体に対して、CORS・プリフライト・
//! 許可されないメソッドの扱いを検証する。

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::{body_bytes, body_json, json_post, send, test_app};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

const ALL_ROUTES: [(&str, &str); 4] = [
    ("/api/config", "GET, OPTIONS"),
    ("/api/get-failed-actions", "POST, OPTIONS"),
    ("/api/retry-actions", "POST, OPTIONS"),
    ("/api/retry", "POST, OPTIONS"),
];

#[tokio::test]
async fn test_全ルートのoptionsは200と空ボディとcorsヘッダーを返す() {
    for (uri, allow_methods) in ALL_ROUTES {
        let app = test_app();

        let response = send(
            app.router,
            Request::builder()
                .method(Method::OPTIONS)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let headers = response.headers().clone();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*", "{uri}");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            allow_methods,
            "{uri}"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type",
            "{uri}"
        );
        assert!(body_bytes(response).await.is_empty(), "{uri}");
        assert!(app.integrator.request_ids.lock().unwrap().is_empty());
    }
}

#[rstest]
#[case(Method::POST, "/api/config")]
#[case(Method::GET, "/api/get-failed-actions")]
#[case(Method::DELETE, "/api/retry-actions")]
#[case(Method::PUT, "/api/retry")]
#[tokio::test]
async fn test_許可されないメソッドは405とcorsヘッダーを返す(
    #[case] method: Method,
    #[case] uri: &str,
) {
    let app = test_app();

    let response = send(
        app.router,
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body_json(response).await, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn test_configはcorsヘッダー付きで公開設定を返す() {
    let app = test_app();

    let response = send(
        app.router,
        Request::builder()
            .uri("/api/config")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, OPTIONS"
    );
    assert_eq!(
        body_json(response).await,
        json!({"serviceUrl": "https://xyz.supabase.co", "publicKey": "anon-key"})
    );
}

#[tokio::test]
async fn test_healthはhealthyを返す() {
    let app = test_app();

    let response = send(
        app.router,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_retryは元ワークフローの実行番号の次で採番する() {
    let app = test_app();
    app.workflow_runs.set_latest(
        toolretry_domain::value_objects::WorkflowId::new("wf-old").unwrap(),
        toolretry_domain::value_objects::RunNumber::new(4).unwrap(),
    );

    let response = send(
        app.router,
        json_post(
            "/api/retry",
            json!({"app_name": "github", "workflow_id": "wf-old", "connection_id": "c"}),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body_json(response).await["run_number"], 5);
    let inserted = app.workflow_runs.inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].workflow_id.as_str(), "wf-new");
}
