//! # 失敗アクション取得ハンドラ
//!
//! 指定した実行の失敗アクション一覧を上流から取得して返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolretry_domain::workflow_run::ExecutionState;
use toolretry_shared::ErrorBody;

use super::non_empty;
use crate::{
    client::{DashboardDataOutcome, DashboardDataRequest, IntegratorClient},
    error::ApiError,
};

const MISSING_FIELDS: &str = "Missing required fields (workflow_id, run_number)";

/// 失敗アクション取得ハンドラの State
pub struct FailedActionsState {
    pub integrator: Arc<dyn IntegratorClient>,
}

/// リクエストボディ
#[derive(Debug, Deserialize)]
pub struct FailedActionsRequest {
    pub workflow_id: Option<String>,
    pub run_number:  Option<u64>,
}

impl FailedActionsRequest {
    /// 空文字列・0 は未指定として扱う
    fn validate(self) -> Result<DashboardDataRequest, ApiError> {
        match (non_empty(self.workflow_id), self.run_number) {
            (Some(workflow_id), Some(run_number)) if run_number > 0 => Ok(DashboardDataRequest {
                workflow_id,
                run_number,
            }),
            _ => Err(ApiError::bad_request(ErrorBody::new(MISSING_FIELDS))),
        }
    }
}

/// レスポンスボディ
///
/// `execution_state` は上流にキーがなければ省略し、`null` はそのまま返す。
#[derive(Debug, Serialize)]
pub struct FailedActionsResponse {
    pub success:         bool,
    pub failed_actions:  Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_state: Option<Value>,
}

/// POST /api/get-failed-actions
#[tracing::instrument(skip_all)]
pub async fn get_failed_actions(
    State(state): State<Arc<FailedActionsState>>,
    payload: Result<Json<FailedActionsRequest>, JsonRejection>,
) -> Result<Json<FailedActionsResponse>, ApiError> {
    let Json(request) = payload?;
    let request = request.validate()?;

    match state.integrator.get_dashboard_data(&request).await? {
        DashboardDataOutcome::Success(data) => {
            let failed_actions = data.failed_actions();
            let execution_state = data.known_execution_state();
            tracing::info!(
                workflow_id = %request.workflow_id,
                count = failed_actions.as_array().map_or(0, Vec::len),
                execution_state = execution_state.map(<&'static str>::from),
                finished = execution_state.is_some_and(ExecutionState::is_terminal),
                "失敗アクションを取得しました"
            );
            Ok(Json(FailedActionsResponse {
                success: true,
                failed_actions,
                execution_state: data.execution_state,
            }))
        }
        DashboardDataOutcome::Failure { status, body } => {
            tracing::warn!(
                workflow_id = %request.workflow_id,
                status,
                "失敗アクションの取得で上流がエラーを返しました"
            );
            Err(ApiError::upstream_fetch_failed(status, body))
        }
    }
}
