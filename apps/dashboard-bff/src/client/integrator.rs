//! # Integrator API クライアント
//!
//! 上流のワークフロー自動化 API との通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /dashboard/get-data` - 実行の失敗アクション一覧を取得
//! - `POST /workflows/test-and-fix-action/run` - テスト・修正ワークフローを起動
//!
//! 上流は 2xx 以外でも JSON を返すことがあり、その内容はブラウザへの
//! 診断情報としてそのまま転送する。そのため 2xx 以外をエラーにせず、
//! ステータスとボディを呼び出し側に返す。

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use toolretry_domain::{value_objects::WorkflowId, workflow_run::ExecutionState};

use super::trigger_payload::TriggerPayload;
use crate::middleware::request_id::inject_request_id;

const GET_DASHBOARD_DATA_PATH: &str = "/dashboard/get-data";
const TEST_AND_FIX_PATH: &str = "/workflows/test-and-fix-action/run";

/// 起動レスポンスに workflow_id も理由も含まれないときの説明
const NO_WORKFLOW_ID_RETURNED: &str = "No workflow_id returned";

/// Integrator API クライアントエラー
///
/// メッセージはそのままブラウザへの `error` として返るため、原因のみを表示する。
#[derive(Debug, Error)]
pub enum IntegratorError {
    /// 接続失敗・ボディ読み取り失敗など
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// レスポンスが JSON として解釈できない
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
}

// --- リクエスト/レスポンス型 ---

/// 失敗アクション取得リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardDataRequest {
    pub workflow_id: String,
    pub run_number:  u64,
}

/// 失敗アクション取得レスポンス（2xx のとき）
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    failed_actions:      Option<Value>,
    /// 上流の実行状態（`FAILED` など、未知の値もそのまま転送する）
    ///
    /// キーがなければ `None`、明示的な `null` は `Some(Value::Null)`。
    #[serde(default, deserialize_with = "present_value")]
    pub execution_state: Option<Value>,
}

/// キーが存在すれば `null` も含めて `Some` にする
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl DashboardData {
    /// 失敗アクション一覧（未設定・null は空配列）
    pub fn failed_actions(&self) -> Value {
        self.failed_actions
            .clone()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }

    /// 既知の実行状態として解釈できれば返す
    pub fn known_execution_state(&self) -> Option<ExecutionState> {
        self.execution_state
            .as_ref()
            .and_then(|value| ExecutionState::deserialize(value).ok())
    }
}

/// 失敗アクション取得の結果
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardDataOutcome {
    Success(DashboardData),
    /// 2xx 以外。ボディはテキストのまま保持する
    Failure { status: u16, body: String },
}

/// 起動に失敗したときの診断情報
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerFailure {
    pub details:      String,
    pub api_response: Value,
    pub http_status:  u16,
}

/// ワークフロー起動レスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerResponse {
    pub status: u16,
    pub body:   Value,
}

impl TriggerResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 上流が採番した workflow_id
    ///
    /// 空でない文字列、または数値を受け付ける。
    pub fn workflow_id(&self) -> Option<WorkflowId> {
        match self.body.get("workflow_id")? {
            Value::String(s) => WorkflowId::new(s.as_str()).ok(),
            Value::Number(n) => WorkflowId::new(n.to_string()).ok(),
            _ => None,
        }
    }

    /// 起動が受け付けられたかを判定する
    ///
    /// 2xx かつ workflow_id を含むときのみ成功とする。
    /// HTTP 200 でも workflow_id がなければ失敗。
    pub fn accepted_workflow_id(&self) -> Result<WorkflowId, TriggerFailure> {
        match self.workflow_id() {
            Some(workflow_id) if self.is_success() => Ok(workflow_id),
            _ => Err(TriggerFailure {
                details:      self.failure_details(),
                api_response: self.body.clone(),
                http_status:  self.status,
            }),
        }
    }

    /// `message`、次に `error`、どちらもなければ固定文言
    fn failure_details(&self) -> String {
        ["message", "error"]
            .iter()
            .find_map(|key| self.body.get(*key).and_then(as_detail_text))
            .unwrap_or_else(|| NO_WORKFLOW_ID_RETURNED.to_string())
    }
}

/// 診断用に値を文字列化する（null・false・空文字・0 は「値なし」）
fn as_detail_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Integrator API クライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait IntegratorClient: Send + Sync {
    /// 実行の失敗アクション一覧を取得する
    async fn get_dashboard_data(
        &self,
        request: &DashboardDataRequest,
    ) -> Result<DashboardDataOutcome, IntegratorError>;

    /// テスト・修正ワークフローを起動する
    async fn trigger_test_and_fix(
        &self,
        payload: &TriggerPayload,
    ) -> Result<TriggerResponse, IntegratorError>;
}

/// Integrator API クライアント実装
#[derive(Debug, Clone)]
pub struct IntegratorClientImpl {
    base_url: String,
    client:   reqwest::Client,
}

impl IntegratorClientImpl {
    /// 新しい IntegratorClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: Integrator API のベース URL（例: `https://integrations-api.composio.io`）
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client:   reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl IntegratorClient for IntegratorClientImpl {
    #[tracing::instrument(skip_all, level = "debug", fields(workflow_id = %request.workflow_id))]
    async fn get_dashboard_data(
        &self,
        request: &DashboardDataRequest,
    ) -> Result<DashboardDataOutcome, IntegratorError> {
        let response = inject_request_id(self.client.post(self.url(GET_DASHBOARD_DATA_PATH)))
            .json(request)
            .send()
            .await?;

        read_dashboard_data(response).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(app_name = %payload.app_name))]
    async fn trigger_test_and_fix(
        &self,
        payload: &TriggerPayload,
    ) -> Result<TriggerResponse, IntegratorError> {
        let response = inject_request_id(self.client.post(self.url(TEST_AND_FIX_PATH)))
            .json(payload)
            .send()
            .await?;

        read_trigger_response(response).await
    }
}

async fn read_dashboard_data(
    response: reqwest::Response,
) -> Result<DashboardDataOutcome, IntegratorError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Ok(DashboardDataOutcome::Failure {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(DashboardDataOutcome::Success(serde_json::from_slice(
        &bytes,
    )?))
}

/// ステータスに関わらずボディを JSON として読む
async fn read_trigger_response(
    response: reqwest::Response,
) -> Result<TriggerResponse, IntegratorError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    let body = serde_json::from_slice(&bytes)?;

    Ok(TriggerResponse { status, body })
}
