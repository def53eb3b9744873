//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! toolretry-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 各モックは書き込まれた値を記録し、`failing()` で生成すると
//! 全操作が [`InfraError::unexpected_status`] を返す。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use toolretry_domain::{
    failed_tool::{FailedToolKey, FailedToolRetryPatch},
    value_objects::{RunNumber, WorkflowId},
    workflow::Workflow,
    workflow_run::NewWorkflowRun,
};

use crate::{
    error::InfraError,
    repository::{FailedToolRepository, WorkflowRepository, WorkflowRunRepository},
};

fn simulated_failure() -> InfraError {
    InfraError::unexpected_status(503, "simulated store failure")
}

// ===== MockFailedToolRepository =====

#[derive(Clone, Default)]
pub struct MockFailedToolRepository {
    patches: Arc<Mutex<Vec<(FailedToolKey, FailedToolRetryPatch)>>>,
    fail:    bool,
}

impl MockFailedToolRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 記録された PATCH（呼び出し順とは限らない）
    pub fn patches(&self) -> Vec<(FailedToolKey, FailedToolRetryPatch)> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl FailedToolRepository for MockFailedToolRepository {
    async fn mark_retrying(
        &self,
        key: &FailedToolKey,
        patch: &FailedToolRetryPatch,
    ) -> Result<(), InfraError> {
        if self.fail {
            return Err(simulated_failure());
        }
        self.patches
            .lock()
            .unwrap()
            .push((key.clone(), patch.clone()));
        Ok(())
    }
}

// ===== MockWorkflowRepository =====

#[derive(Clone, Default)]
pub struct MockWorkflowRepository {
    workflows: Arc<Mutex<Vec<Workflow>>>,
    fail:      bool,
}

impl MockWorkflowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn workflows(&self) -> Vec<Workflow> {
        self.workflows.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowRepository for MockWorkflowRepository {
    async fn upsert(&self, workflow: &Workflow) -> Result<(), InfraError> {
        if self.fail {
            return Err(simulated_failure());
        }
        let mut workflows = self.workflows.lock().unwrap();
        workflows.retain(|w| w.workflow_id != workflow.workflow_id);
        workflows.push(workflow.clone());
        Ok(())
    }
}

// ===== MockWorkflowRunRepository =====

#[derive(Clone, Default)]
pub struct MockWorkflowRunRepository {
    latest:   Arc<Mutex<HashMap<WorkflowId, RunNumber>>>,
    inserted: Arc<Mutex<Vec<NewWorkflowRun>>>,
    fail:     bool,
}

impl MockWorkflowRunRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 既存の最大実行番号を登録する
    pub fn set_latest(&self, workflow_id: WorkflowId, run_number: RunNumber) {
        self.latest.lock().unwrap().insert(workflow_id, run_number);
    }

    pub fn inserted(&self) -> Vec<NewWorkflowRun> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowRunRepository for MockWorkflowRunRepository {
    async fn find_latest_run_number(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<RunNumber>, InfraError> {
        if self.fail {
            return Err(simulated_failure());
        }
        Ok(self.latest.lock().unwrap().get(workflow_id).copied())
    }

    async fn insert(&self, run: &NewWorkflowRun) -> Result<(), InfraError> {
        if self.fail {
            return Err(simulated_failure());
        }
        self.inserted.lock().unwrap().push(run.clone());
        Ok(())
    }
}
