//! # 失敗ツール（failed_tools）
//!
//! テストに失敗したアクションの追跡行と、リトライ開始時に書き込む差分を定義する。
//!
//! ## 状態遷移
//!
//! ```text
//! failed ──(リトライ起動)──▶ retrying ──(再起動)──▶ retrying
//! ```
//!
//! `retrying` 以降の遷移（成功・再失敗）は外部のポーラーが担当し、本システムは観測しない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{
    DomainError,
    value_objects::{RunNumber, WorkflowId},
};

/// 失敗ツールのステータス
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FailedToolStatus {
    /// テスト失敗（リトライ待ち）
    Failed,
    /// リトライ起動済み
    Retrying,
}

impl FailedToolStatus {
    /// 状態遷移を検証して遷移後の状態を返す
    ///
    /// 許可される遷移は `failed → retrying` と `retrying → retrying`（再起動）のみ。
    pub fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        match (self, next) {
            (Self::Failed, Self::Retrying) | (Self::Retrying, Self::Retrying) => Ok(next),
            (from, to) => Err(DomainError::InvalidTransition {
                from: from.into(),
                to:   to.into(),
            }),
        }
    }
}

/// 失敗ツール行の識別子（toolkit と action_name の組で一意）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FailedToolKey {
    pub toolkit:     String,
    pub action_name: String,
}

impl FailedToolKey {
    pub fn new(toolkit: impl Into<String>, action_name: impl Into<String>) -> Self {
        Self {
            toolkit:     toolkit.into(),
            action_name: action_name.into(),
        }
    }
}

/// リトライ開始時に失敗ツール行へ書き込む差分
///
/// 新規ワークフローとして起動するため、`retry_run_number` は常に 1。
/// `status` は `failed → retrying` の遷移を検証した結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedToolRetryPatch {
    pub status:            FailedToolStatus,
    pub retry_workflow_id: WorkflowId,
    pub retry_run_number:  RunNumber,
    pub retried_at:        DateTime<Utc>,
}

impl FailedToolRetryPatch {
    pub fn new(
        retry_workflow_id: WorkflowId,
        retried_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            status: FailedToolStatus::Failed.transition_to(FailedToolStatus::Retrying)?,
            retry_workflow_id,
            retry_run_number: RunNumber::first(),
            retried_at,
        })
    }
}
