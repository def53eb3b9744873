//! # ワークフロー実行（workflow_runs）
//!
//! ワークフローの各実行を表す行。`(workflow_id, run_number)` で識別される。
//!
//! 本システムが書き込むのは起動直後の状態（`active` / `PENDING`）のみで、
//! 以降の遷移は外部のポーラーや Webhook が担当する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::value_objects::{RunNumber, WorkflowId};

/// 実行行のステータス
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkflowRunStatus {
    /// 実行中（起動済み）
    Active,
}

/// 上流エンジン上の実行状態
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    /// 起動要求済み・未実行
    Pending,
    /// 実行中
    Running,
    /// 完了
    Completed,
    /// 失敗
    Failed,
}

impl ExecutionState {
    /// 終端状態かどうか
    ///
    /// 本システムが書き込むのは [`Pending`](Self::Pending) のみ。
    /// 残りの状態は上流の取得結果（`execution_state`）を解釈するときに使う。
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// 新規挿入するワークフロー実行行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWorkflowRun {
    pub workflow_id:     WorkflowId,
    pub run_number:      RunNumber,
    pub status:          WorkflowRunStatus,
    pub execution_state: ExecutionState,
    /// 対象アクション数（アクション単位のリトライでのみ記録する）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total:           Option<u32>,
    pub started_at:      DateTime<Utc>,
}

impl NewWorkflowRun {
    /// 起動直後（`active` / `PENDING`）の実行行を作成する
    pub fn pending(
        workflow_id: WorkflowId,
        run_number: RunNumber,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            workflow_id,
            run_number,
            status: WorkflowRunStatus::Active,
            execution_state: ExecutionState::Pending,
            total: None,
            started_at,
        }
    }

    pub fn with_total(mut self, total: u32) -> Self {
        self.total = Some(total);
        self
    }
}
