//! # WorkflowRepository
//!
//! `workflows` テーブルへの upsert を担当する。

use async_trait::async_trait;
use reqwest::Method;
use toolretry_domain::workflow::Workflow;

use crate::{
    error::InfraError,
    rest_store::{RestStoreClient, ensure_success, prefer, table},
};

/// ワークフローリポジトリトレイト
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// ワークフロー行を upsert する
    ///
    /// `workflow_id` が既に存在する場合は既存行にマージする。
    async fn upsert(&self, workflow: &Workflow) -> Result<(), InfraError>;
}

/// REST 実装の WorkflowRepository
#[derive(Debug, Clone)]
pub struct RestWorkflowRepository {
    store: RestStoreClient,
}

impl RestWorkflowRepository {
    pub fn new(store: RestStoreClient) -> Self {
        Self { store }
    }

    fn upsert_request(&self, workflow: &Workflow) -> reqwest::RequestBuilder {
        self.store
            .request(Method::POST, table::WORKFLOWS)
            .header("Prefer", prefer::MERGE_DUPLICATES)
            .json(workflow)
    }
}

#[async_trait]
impl WorkflowRepository for RestWorkflowRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(workflow_id = %workflow.workflow_id))]
    async fn upsert(&self, workflow: &Workflow) -> Result<(), InfraError> {
        let response = self.upsert_request(workflow).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
