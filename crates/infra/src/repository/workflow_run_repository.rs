//! # WorkflowRunRepository
//!
//! `workflow_runs` テーブルの読み書きを担当する。
//!
//! 実行番号の採番（最大値の取得 → 挿入）はトランザクションで保護されない。
//! 同一ワークフローへの並行リトライは同じ実行番号を挿入しうる。

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use toolretry_domain::{
    value_objects::{RunNumber, WorkflowId},
    workflow_run::NewWorkflowRun,
};

use crate::{
    error::InfraError,
    rest_store::{RestStoreClient, ensure_success, prefer, table},
};

/// ワークフロー実行リポジトリトレイト
#[async_trait]
pub trait WorkflowRunRepository: Send + Sync {
    /// ワークフローの最大実行番号を取得する
    ///
    /// 実行が 1 件もなければ `None` を返す。
    async fn find_latest_run_number(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<RunNumber>, InfraError>;

    /// 実行行を挿入する
    async fn insert(&self, run: &NewWorkflowRun) -> Result<(), InfraError>;
}

/// REST 実装の WorkflowRunRepository
#[derive(Debug, Clone)]
pub struct RestWorkflowRunRepository {
    store: RestStoreClient,
}

impl RestWorkflowRunRepository {
    pub fn new(store: RestStoreClient) -> Self {
        Self { store }
    }

    fn find_latest_request(&self, workflow_id: &WorkflowId) -> reqwest::RequestBuilder {
        self.store
            .request(Method::GET, table::WORKFLOW_RUNS)
            .query(&[
                ("workflow_id", format!("eq.{workflow_id}")),
                ("select", "run_number".to_string()),
                ("order", "run_number.desc".to_string()),
                ("limit", "1".to_string()),
            ])
    }

    fn insert_request(&self, run: &NewWorkflowRun) -> reqwest::RequestBuilder {
        self.store
            .request(Method::POST, table::WORKFLOW_RUNS)
            .header("Prefer", prefer::RETURN_MINIMAL)
            .json(run)
    }
}

/// `select=run_number` の結果から最大実行番号を取り出す
///
/// 先頭行の `run_number` が 1 以上の整数で `u32` に収まるときのみ採用する。
/// 行がない、null・0・負数・小数・範囲外の値は「実行なし」とみなす。
fn latest_from_rows(rows: &Value) -> Option<RunNumber> {
    rows.get(0)?
        .get("run_number")?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .and_then(|n| RunNumber::new(n).ok())
}

#[async_trait]
impl WorkflowRunRepository for RestWorkflowRunRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%workflow_id))]
    async fn find_latest_run_number(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<RunNumber>, InfraError> {
        let response = self.find_latest_request(workflow_id).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        let rows: Value = serde_json::from_slice(&bytes)?;

        Ok(latest_from_rows(&rows))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(workflow_id = %run.workflow_id, run_number = %run.run_number))]
    async fn insert(&self, run: &NewWorkflowRun) -> Result<(), InfraError> {
        let response = self.insert_request(run).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
