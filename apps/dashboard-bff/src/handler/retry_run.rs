//! # 実行単位リトライハンドラ
//!
//! 既存ワークフローの失敗アクション（または全アクション）を対象に、
//! 新しいワークフローとして再実行する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use toolretry_domain::value_objects::{Environment, LinearTicket, RunNumber, WorkflowId};
use toolretry_shared::ErrorBody;

use super::{is_truthy, non_empty};
use crate::{
    error::ApiError,
    usecase::{RetryRunInput, RetryRunUseCaseImpl},
};

const MISSING_FIELDS: &str = "Missing required fields (app_name, workflow_id, connection_id)";

/// 実行単位リトライハンドラの State
pub struct RetryRunState {
    pub usecase: RetryRunUseCaseImpl,
}

/// リクエストボディ
///
/// `failed_actions` の要素は形を問わず上流へそのまま渡す。
/// `complete_rerun` は真偽値以外も受け付け、真偽として解釈する。
#[derive(Debug, Deserialize)]
pub struct RetryRunRequest {
    pub app_name:       Option<String>,
    pub workflow_id:    Option<String>,
    pub connection_id:  Option<String>,
    pub environment:    Option<String>,
    pub linear_ticket:  Option<String>,
    pub failed_actions: Option<Vec<Value>>,
    pub complete_rerun: Option<Value>,
}

impl RetryRunRequest {
    fn validate(self) -> Result<RetryRunInput, ApiError> {
        let workflow_id = self
            .workflow_id
            .and_then(|id| WorkflowId::new(id).ok());

        match (non_empty(self.app_name), workflow_id, non_empty(self.connection_id)) {
            (Some(app_name), Some(workflow_id), Some(connection_id)) => Ok(RetryRunInput {
                app_name,
                workflow_id,
                connection_id,
                environment: Environment::or_default(self.environment.as_deref()),
                linear_ticket: LinearTicket::parse(self.linear_ticket.as_deref()),
                failed_actions: self.failed_actions.unwrap_or_default(),
                complete_rerun: self.complete_rerun.as_ref().is_some_and(is_truthy),
            }),
            _ => Err(ApiError::bad_request(ErrorBody::new(MISSING_FIELDS))),
        }
    }
}

/// 再実行対象のアクション数
///
/// 全体再実行のときは `"ALL"`、それ以外は失敗アクションの件数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionsCount {
    All,
    Count(usize),
}

impl ActionsCount {
    fn of(input: &RetryRunInput) -> Self {
        if input.complete_rerun {
            Self::All
        } else {
            Self::Count(input.failed_actions.len())
        }
    }
}

impl Serialize for ActionsCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("ALL"),
            Self::Count(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

/// レスポンスボディ
#[derive(Debug, Serialize)]
pub struct RetryRunResponse {
    pub success:        bool,
    pub workflow_id:    WorkflowId,
    pub run_number:     RunNumber,
    pub actions_count:  ActionsCount,
    pub complete_rerun: bool,
    pub api_response:   Value,
}

/// POST /api/retry
#[tracing::instrument(skip_all)]
pub async fn retry_run(
    State(state): State<Arc<RetryRunState>>,
    payload: Result<Json<RetryRunRequest>, JsonRejection>,
) -> Result<Json<RetryRunResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate()?;
    let actions_count = ActionsCount::of(&input);
    let complete_rerun = input.complete_rerun;

    let output = state.usecase.execute(input).await?;

    Ok(Json(RetryRunResponse {
        success: true,
        workflow_id: output.workflow_id,
        run_number: output.run_number,
        actions_count,
        complete_rerun,
        api_response: output.api_response,
    }))
}
