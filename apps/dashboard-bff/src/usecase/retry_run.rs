//! ワークフロー実行単位のリトライユースケース

use std::sync::Arc;

use serde_json::Value;
use toolretry_domain::{
    clock::Clock,
    value_objects::{Environment, LinearTicket, RunNumber, WorkflowId},
    workflow_run::NewWorkflowRun,
};
use toolretry_infra::repository::WorkflowRunRepository;

use super::RetryError;
use crate::client::{IntegratorClient, TriggerPayload};

/// 実行単位リトライの入力（検証済み）
#[derive(Debug, Clone)]
pub struct RetryRunInput {
    pub app_name:       String,
    /// 再実行元のワークフロー
    pub workflow_id:    WorkflowId,
    pub connection_id:  String,
    pub environment:    Environment,
    pub linear_ticket:  Option<LinearTicket>,
    /// 上流へそのまま渡す（要素の形は問わない）
    pub failed_actions: Vec<Value>,
    pub complete_rerun: bool,
}

impl RetryRunInput {
    /// 上流に渡す対象アクション
    ///
    /// 全体再実行、または失敗アクションが空のときは `None`（全アクション対象）。
    pub fn target_actions(&self) -> Option<Vec<Value>> {
        (!self.complete_rerun && !self.failed_actions.is_empty())
            .then(|| self.failed_actions.clone())
    }
}

/// 実行単位リトライの結果
#[derive(Debug, Clone)]
pub struct RetryRunOutput {
    /// 上流が新たに採番した workflow_id
    pub workflow_id:  WorkflowId,
    pub run_number:   RunNumber,
    pub api_response: Value,
}

/// ワークフロー実行単位のリトライユースケース
///
/// 起動後に元ワークフローの最大実行番号を読み、その次の番号で
/// 新しい workflow_id の実行行を挿入する。
pub struct RetryRunUseCaseImpl {
    integrator:    Arc<dyn IntegratorClient>,
    workflow_runs: Arc<dyn WorkflowRunRepository>,
    clock:         Arc<dyn Clock>,
}

impl RetryRunUseCaseImpl {
    pub fn new(
        integrator: Arc<dyn IntegratorClient>,
        workflow_runs: Arc<dyn WorkflowRunRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            integrator,
            workflow_runs,
            clock,
        }
    }

    #[tracing::instrument(skip_all, fields(previous_workflow_id = %input.workflow_id, complete_rerun = input.complete_rerun))]
    pub async fn execute(&self, input: RetryRunInput) -> Result<RetryRunOutput, RetryError> {
        let mut payload = TriggerPayload::new(
            input.app_name.as_str(),
            input.connection_id.as_str(),
            input.environment.clone(),
            input.linear_ticket.as_ref(),
        )
        .with_previous_workflow_id(input.workflow_id.clone());
        if let Some(action_names) = input.target_actions() {
            payload = payload.with_action_names(action_names);
        }

        let response = self.integrator.trigger_test_and_fix(&payload).await?;
        let new_workflow_id = response.accepted_workflow_id()?;
        tracing::info!(%new_workflow_id, "ワークフローを再起動しました");

        let run_number = RunNumber::next_after(self.latest_run_number(&input.workflow_id).await?);

        let run = NewWorkflowRun::pending(new_workflow_id.clone(), run_number, self.clock.now());
        if let Err(e) = self.workflow_runs.insert(&run).await {
            tracing::warn!(
                workflow_id = %new_workflow_id,
                %run_number,
                error = %e,
                "実行行の挿入に失敗しました"
            );
        }

        Ok(RetryRunOutput {
            workflow_id: new_workflow_id,
            run_number,
            api_response: response.body,
        })
    }

    /// 元ワークフローの最大実行番号
    ///
    /// ストアがリクエストを拒否した（2xx 以外）場合は実行なしとみなす。
    /// 通信失敗・レスポンス解析失敗はエラーとして返す。
    async fn latest_run_number(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<RunNumber>, RetryError> {
        match self.workflow_runs.find_latest_run_number(workflow_id).await {
            Ok(latest) => Ok(latest),
            Err(e) if e.is_unexpected_status() => {
                tracing::warn!(%workflow_id, error = %e, "最大実行番号の取得に失敗したため 1 から採番します");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
