//! # アクション単位リトライハンドラ
//!
//! 指定したアクションのみを対象にテスト・修正ワークフローを起動する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolretry_domain::value_objects::{Environment, LinearTicket, WorkflowId};
use toolretry_shared::ErrorBody;

use super::non_empty;
use crate::{
    error::ApiError,
    usecase::{RetryActionsInput, RetryActionsUseCaseImpl},
};

/// アクション単位リトライハンドラの State
pub struct RetryActionsState {
    pub usecase: RetryActionsUseCaseImpl,
}

/// リクエストボディ
///
/// `action_names` は型が合わない場合も 400（必須項目エラー）にするため `Value` で受ける。
#[derive(Debug, Deserialize)]
pub struct RetryActionsRequest {
    pub toolkit:       Option<String>,
    pub connection_id: Option<String>,
    pub action_names:  Option<Value>,
    pub linear_ticket: Option<String>,
    pub environment:   Option<String>,
}

impl RetryActionsRequest {
    fn validate(self) -> Result<RetryActionsInput, ApiError> {
        let action_names = self.action_names.as_ref().and_then(string_array);

        match (non_empty(self.toolkit), non_empty(self.connection_id), action_names) {
            (Some(toolkit), Some(connection_id), Some(action_names)) => Ok(RetryActionsInput {
                toolkit,
                connection_id,
                action_names,
                linear_ticket: LinearTicket::parse(self.linear_ticket.as_deref()),
                environment: Environment::normalized(self.environment.as_deref()),
            }),
            _ => Err(ApiError::bad_request(
                ErrorBody::new("Missing required fields").with_required([
                    "toolkit",
                    "connection_id",
                    "action_names (array)",
                ]),
            )),
        }
    }
}

/// 空でない文字列配列なら取り出す
fn string_array(value: &Value) -> Option<Vec<String>> {
    let names = value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    (!names.is_empty()).then_some(names)
}

/// レスポンスボディ
#[derive(Debug, Serialize)]
pub struct RetryActionsResponse {
    pub success:       bool,
    pub workflow_id:   WorkflowId,
    pub toolkit:       String,
    pub actions_count: usize,
    pub actions:       Vec<String>,
    pub api_response:  Value,
}

/// POST /api/retry-actions
#[tracing::instrument(skip_all)]
pub async fn retry_actions(
    State(state): State<Arc<RetryActionsState>>,
    payload: Result<Json<RetryActionsRequest>, JsonRejection>,
) -> Result<Json<RetryActionsResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate()?;
    let toolkit = input.toolkit.clone();
    let actions = input.action_names.clone();

    let output = state.usecase.execute(input).await?;

    Ok(Json(RetryActionsResponse {
        success: true,
        workflow_id: output.workflow_id,
        toolkit,
        actions_count: actions.len(),
        actions,
        api_response: output.api_response,
    }))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        routing::post,
    };
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use toolretry_domain::clock::FixedClock;
    use toolretry_infra::mock::{
        MockFailedToolRepository,
        MockWorkflowRepository,
        MockWorkflowRunRepository,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::client::{
        DashboardDataOutcome,
        DashboardDataRequest,
        IntegratorClient,
        IntegratorError,
        TriggerPayload,
        TriggerResponse,
    };

    struct StubIntegrator {
        response: TriggerResponse,
        payloads: std::sync::Mutex<Vec<TriggerPayload>>,
    }

    impl StubIntegrator {
        fn new(status: u16, body: Value) -> Self {
            Self {
                response: TriggerResponse { status, body },
                payloads: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IntegratorClient for StubIntegrator {
        async fn get_dashboard_data(
            &self,
            _request: &DashboardDataRequest,
        ) -> Result<DashboardDataOutcome, IntegratorError> {
            unreachable!("リトライでは呼ばれない")
        }

        async fn trigger_test_and_fix(
            &self,
            payload: &TriggerPayload,
        ) -> Result<TriggerResponse, IntegratorError> {
            self.payloads.lock().unwrap().push(payload.clone());
            Ok(self.response.clone())
        }
    }

    /// 上流のレスポンスが JSON として解釈できないスタブ
    struct InvalidJsonIntegrator;

    #[async_trait]
    impl IntegratorClient for InvalidJsonIntegrator {
        async fn get_dashboard_data(
            &self,
            _request: &DashboardDataRequest,
        ) -> Result<DashboardDataOutcome, IntegratorError> {
            unreachable!("リトライでは呼ばれない")
        }

        async fn trigger_test_and_fix(
            &self,
            _payload: &TriggerPayload,
        ) -> Result<TriggerResponse, IntegratorError> {
            Err(invalid_json_error().into())
        }
    }

    fn invalid_json_error() -> serde_json::Error {
        serde_json::from_str::<Value>("<html>").unwrap_err()
    }

    fn test_app(integrator: Arc<dyn IntegratorClient>) -> Router {
        let usecase = RetryActionsUseCaseImpl::new(
            integrator,
            Arc::new(MockFailedToolRepository::new()),
            Arc::new(MockWorkflowRepository::new()),
            Arc::new(MockWorkflowRunRepository::new()),
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            )),
        );
        Router::new()
            .route("/api/retry-actions", post(retry_actions))
            .with_state(Arc::new(RetryActionsState { usecase }))
    }

    async fn send(app: Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/retry-actions")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_起動成功で件数とアクションを返す() {
        // Given
        let integrator = Arc::new(StubIntegrator::new(200, json!({"workflow_id": "wf-new"})));

        // When
        let (status, body) = send(
            test_app(integrator),
            json!({
                "toolkit": "github",
                "connection_id": "conn-1",
                "action_names": ["GITHUB_A", "GITHUB_B"]
            }),
        )
        .await;

        // Then
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "workflow_id": "wf-new",
                "toolkit": "github",
                "actions_count": 2,
                "actions": ["GITHUB_A", "GITHUB_B"],
                "api_response": {"workflow_id": "wf-new"}
            })
        );
    }

    #[rstest]
    #[case(Some("prod"), "production")]
    #[case(None, "production")]
    #[case(Some("staging"), "staging")]
    #[tokio::test]
    async fn test_環境はprodを読み替え既定値を補う(
        #[case] environment: Option<&str>,
        #[case] expected: &str,
    ) {
        let integrator = Arc::new(StubIntegrator::new(200, json!({"workflow_id": "wf-new"})));
        let mut request = json!({
            "toolkit": "github",
            "connection_id": "conn-1",
            "action_names": ["GITHUB_A"]
        });
        if let Some(environment) = environment {
            request["environment"] = json!(environment);
        }

        let (status, _) = send(test_app(integrator.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        let payloads = integrator.payloads.lock().unwrap();
        assert_eq!(payloads[0].env.as_str(), expected);
    }

    #[rstest]
    #[case(json!({"connection_id": "c", "action_names": ["A"]}))]
    #[case(json!({"toolkit": "t", "action_names": ["A"]}))]
    #[case(json!({"toolkit": "t", "connection_id": "c"}))]
    #[case(json!({"toolkit": "t", "connection_id": "c", "action_names": []}))]
    #[case(json!({"toolkit": "t", "connection_id": "c", "action_names": "A"}))]
    #[tokio::test]
    async fn test_必須項目が欠けると400で必須項目一覧を返す(#[case] request: Value) {
        let integrator = Arc::new(StubIntegrator::new(200, json!({"workflow_id": "wf-new"})));

        let (status, body) = send(test_app(integrator.clone()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": "Missing required fields",
                "required": ["toolkit", "connection_id", "action_names (array)"]
            })
        );
        assert!(integrator.payloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_workflow_idなしの200は500で診断情報を返す() {
        let integrator = Arc::new(StubIntegrator::new(200, json!({"error": "invalid connection"})));

        let (status, body) = send(
            test_app(integrator),
            json!({
                "toolkit": "github",
                "connection_id": "conn-1",
                "action_names": ["GITHUB_A"]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Failed to trigger workflow",
                "details": "invalid connection",
                "api_response": {"error": "invalid connection"},
                "http_status": 200
            })
        );
    }

    #[tokio::test]
    async fn test_上流レスポンスの解析失敗は500でメッセージを返す() {
        let (status, body) = send(
            test_app(Arc::new(InvalidJsonIntegrator)),
            json!({
                "toolkit": "github",
                "connection_id": "conn-1",
                "action_names": ["GITHUB_A"]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": invalid_json_error().to_string()}));
    }
}
