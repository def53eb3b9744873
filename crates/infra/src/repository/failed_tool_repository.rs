//! # FailedToolRepository
//!
//! `failed_tools` テーブルへの書き込みを担当する。
//!
//! 行は `(toolkit, action_name)` で一意に特定し、PATCH で差分のみを書き込む。

use async_trait::async_trait;
use reqwest::Method;
use toolretry_domain::failed_tool::{FailedToolKey, FailedToolRetryPatch};

use crate::{
    error::InfraError,
    rest_store::{RestStoreClient, ensure_success, prefer, table},
};

/// 失敗ツールリポジトリトレイト
#[async_trait]
pub trait FailedToolRepository: Send + Sync {
    /// 失敗ツール行をリトライ中に更新する
    ///
    /// 一致する行が存在しなくてもエラーにはならない（PATCH は 0 行更新で成功する）。
    async fn mark_retrying(
        &self,
        key: &FailedToolKey,
        patch: &FailedToolRetryPatch,
    ) -> Result<(), InfraError>;
}

/// REST 実装の FailedToolRepository
#[derive(Debug, Clone)]
pub struct RestFailedToolRepository {
    store: RestStoreClient,
}

impl RestFailedToolRepository {
    pub fn new(store: RestStoreClient) -> Self {
        Self { store }
    }

    fn mark_retrying_request(
        &self,
        key: &FailedToolKey,
        patch: &FailedToolRetryPatch,
    ) -> reqwest::RequestBuilder {
        self.store
            .request(Method::PATCH, table::FAILED_TOOLS)
            .query(&[
                ("toolkit", format!("eq.{}", key.toolkit)),
                ("action_name", format!("eq.{}", key.action_name)),
            ])
            .header("Prefer", prefer::RETURN_MINIMAL)
            .json(patch)
    }
}

#[async_trait]
impl FailedToolRepository for RestFailedToolRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(toolkit = %key.toolkit, action_name = %key.action_name))]
    async fn mark_retrying(
        &self,
        key: &FailedToolKey,
        patch: &FailedToolRetryPatch,
    ) -> Result<(), InfraError> {
        let response = self.mark_retrying_request(key, patch).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
