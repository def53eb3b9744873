//! 統合テスト共通のスタブとアプリ構築

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use toolretry_dashboard_bff::{
    app_builder::{AppDependencies, build_app},
    client::{
        DashboardDataOutcome,
        DashboardDataRequest,
        IntegratorClient,
        IntegratorError,
        TriggerPayload,
        TriggerResponse,
    },
    config::PublicConfig,
    middleware::request_id::current_request_id,
};
use toolretry_domain::clock::FixedClock;
use toolretry_infra::mock::{
    MockFailedToolRepository,
    MockWorkflowRepository,
    MockWorkflowRunRepository,
};
use tower::ServiceExt;

/// 呼び出し時の Request ID を記録する Integrator スタブ
pub struct RecordingIntegrator {
    pub request_ids: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl IntegratorClient for RecordingIntegrator {
    async fn get_dashboard_data(
        &self,
        _request: &DashboardDataRequest,
    ) -> Result<DashboardDataOutcome, IntegratorError> {
        self.request_ids.lock().unwrap().push(current_request_id());
        Ok(DashboardDataOutcome::Success(
            serde_json::from_value(json!({"failed_actions": [], "execution_state": "FAILED"}))
                .unwrap(),
        ))
    }

    async fn trigger_test_and_fix(
        &self,
        _payload: &TriggerPayload,
    ) -> Result<TriggerResponse, IntegratorError> {
        self.request_ids.lock().unwrap().push(current_request_id());
        Ok(TriggerResponse {
            status: 200,
            body:   json!({"workflow_id": "wf-new"}),
        })
    }
}

pub struct TestApp {
    pub router:        Router,
    pub integrator:    Arc<RecordingIntegrator>,
    pub workflow_runs: MockWorkflowRunRepository,
}

pub fn test_app() -> TestApp {
    let integrator = Arc::new(RecordingIntegrator {
        request_ids: Mutex::new(Vec::new()),
    });
    let workflow_runs = MockWorkflowRunRepository::new();
    let deps = AppDependencies {
        integrator:    integrator.clone(),
        failed_tools:  Arc::new(MockFailedToolRepository::new()),
        workflows:     Arc::new(MockWorkflowRepository::new()),
        workflow_runs: Arc::new(workflow_runs.clone()),
        clock:         Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        )),
    };
    let public_config = PublicConfig {
        service_url: "https://xyz.supabase.co".to_string(),
        public_key:  "anon-key".to_string(),
    };

    TestApp {
        router: build_app(public_config, deps),
        integrator,
        workflow_runs,
    }
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
