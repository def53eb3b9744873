//! アクション単位のリトライユースケース

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use toolretry_domain::{
    clock::Clock,
    failed_tool::{FailedToolKey, FailedToolRetryPatch},
    value_objects::{Environment, LinearTicket, RunNumber, WorkflowId},
    workflow::Workflow,
    workflow_run::NewWorkflowRun,
};
use toolretry_infra::repository::{
    FailedToolRepository,
    WorkflowRepository,
    WorkflowRunRepository,
};

use super::RetryError;
use crate::client::{IntegratorClient, TriggerPayload};

/// アクション単位リトライの入力（検証済み）
#[derive(Debug, Clone)]
pub struct RetryActionsInput {
    pub toolkit:       String,
    pub connection_id: String,
    /// 空でないこと
    pub action_names:  Vec<String>,
    pub linear_ticket: Option<LinearTicket>,
    pub environment:   Environment,
}

/// 失敗ツール行 1 件分の更新結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub action_name: String,
    /// 失敗時のエラーメッセージ
    pub error:       Option<String>,
}

impl PatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// アクション単位リトライの結果
#[derive(Debug, Clone)]
pub struct RetryActionsOutput {
    pub workflow_id:    WorkflowId,
    pub patch_outcomes: Vec<PatchOutcome>,
    /// 上流の起動レスポンス（そのまま返す）
    pub api_response:   Value,
}

/// アクション単位のリトライユースケース
///
/// 1. 指定アクションのみを対象に上流でワークフローを起動
/// 2. 失敗ツール行をリトライ中に更新（アクションごとに並行）
/// 3. ワークフロー行を upsert
/// 4. 実行行（run_number = 1）を挿入
///
/// 2〜4 は失敗してもログに残すだけで、レスポンスには影響しない。
pub struct RetryActionsUseCaseImpl {
    integrator:    Arc<dyn IntegratorClient>,
    failed_tools:  Arc<dyn FailedToolRepository>,
    workflows:     Arc<dyn WorkflowRepository>,
    workflow_runs: Arc<dyn WorkflowRunRepository>,
    clock:         Arc<dyn Clock>,
}

impl RetryActionsUseCaseImpl {
    pub fn new(
        integrator: Arc<dyn IntegratorClient>,
        failed_tools: Arc<dyn FailedToolRepository>,
        workflows: Arc<dyn WorkflowRepository>,
        workflow_runs: Arc<dyn WorkflowRunRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            integrator,
            failed_tools,
            workflows,
            workflow_runs,
            clock,
        }
    }

    #[tracing::instrument(skip_all, fields(toolkit = %input.toolkit, actions = input.action_names.len()))]
    pub async fn execute(&self, input: RetryActionsInput) -> Result<RetryActionsOutput, RetryError> {
        let payload = TriggerPayload::new(
            input.toolkit.as_str(),
            input.connection_id.as_str(),
            input.environment.clone(),
            input.linear_ticket.as_ref(),
        )
        .with_action_names(input.action_names.clone());

        let response = self.integrator.trigger_test_and_fix(&payload).await?;
        let workflow_id = response.accepted_workflow_id()?;
        tracing::info!(%workflow_id, "ワークフローを起動しました");

        let now = self.clock.now();
        let patch = FailedToolRetryPatch::new(workflow_id.clone(), now)?;
        let patch_outcomes = self
            .mark_actions_retrying(&input.toolkit, &input.action_names, &patch)
            .await;

        let workflow = Workflow::new(
            workflow_id.clone(),
            input.toolkit.as_str(),
            input.linear_ticket.as_ref(),
            input.connection_id.as_str(),
            input.environment,
        );
        if let Err(e) = self.workflows.upsert(&workflow).await {
            tracing::warn!(%workflow_id, error = %e, "ワークフロー行の upsert に失敗しました");
        }

        let total = u32::try_from(input.action_names.len()).unwrap_or(u32::MAX);
        let run = NewWorkflowRun::pending(workflow_id.clone(), RunNumber::first(), now)
            .with_total(total);
        if let Err(e) = self.workflow_runs.insert(&run).await {
            tracing::warn!(%workflow_id, error = %e, "実行行の挿入に失敗しました");
        }

        Ok(RetryActionsOutput {
            workflow_id,
            patch_outcomes,
            api_response: response.body,
        })
    }

    /// 失敗ツール行をアクションごとに並行して更新する
    async fn mark_actions_retrying(
        &self,
        toolkit: &str,
        action_names: &[String],
        patch: &FailedToolRetryPatch,
    ) -> Vec<PatchOutcome> {
        let outcomes = join_all(action_names.iter().map(|action_name| {
            let key = FailedToolKey::new(toolkit, action_name.as_str());
            async move {
                let result = self.failed_tools.mark_retrying(&key, patch).await;
                PatchOutcome {
                    action_name: key.action_name,
                    error:       result.err().map(|e| e.to_string()),
                }
            }
        }))
        .await;

        for outcome in outcomes.iter().filter(|o| !o.is_success()) {
            tracing::warn!(
                action_name = %outcome.action_name,
                error = outcome.error.as_deref().unwrap_or_default(),
                "失敗ツール行の更新に失敗しました"
            );
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use toolretry_domain::clock::FixedClock;
    use toolretry_infra::mock::{
        MockFailedToolRepository,
        MockWorkflowRepository,
        MockWorkflowRunRepository,
    };

    use super::*;
    use crate::client::{
        DashboardDataOutcome,
        DashboardDataRequest,
        IntegratorError,
        TriggerResponse,
    };

    /// 起動レスポンスを固定で返し、受け取ったペイロードを記録するスタブ
    struct StubIntegrator {
        response: TriggerResponse,
        payloads: std::sync::Mutex<Vec<TriggerPayload>>,
    }

    impl StubIntegrator {
        fn new(status: u16, body: Value) -> Self {
            Self {
                response: TriggerResponse { status, body },
                payloads: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IntegratorClient for StubIntegrator {
        async fn get_dashboard_data(
            &self,
            _request: &DashboardDataRequest,
        ) -> Result<DashboardDataOutcome, IntegratorError> {
            unreachable!("リトライでは呼ばれない")
        }

        async fn trigger_test_and_fix(
            &self,
            payload: &TriggerPayload,
        ) -> Result<TriggerResponse, IntegratorError> {
            self.payloads.lock().unwrap().push(payload.clone());
            Ok(self.response.clone())
        }
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn input() -> RetryActionsInput {
        RetryActionsInput {
            toolkit:       "github".to_string(),
            connection_id: "conn-1".to_string(),
            action_names:  vec!["GITHUB_A".to_string(), "GITHUB_B".to_string()],
            linear_ticket: LinearTicket::parse(Some("ENG-5")),
            environment:   Environment::normalized(Some("prod")),
        }
    }

    struct Fixture {
        integrator:    Arc<StubIntegrator>,
        failed_tools:  MockFailedToolRepository,
        workflows:     MockWorkflowRepository,
        workflow_runs: MockWorkflowRunRepository,
    }

    impl Fixture {
        fn new(integrator: StubIntegrator) -> Self {
            Self {
                integrator:    Arc::new(integrator),
                failed_tools:  MockFailedToolRepository::new(),
                workflows:     MockWorkflowRepository::new(),
                workflow_runs: MockWorkflowRunRepository::new(),
            }
        }

        fn sut(&self) -> RetryActionsUseCaseImpl {
            RetryActionsUseCaseImpl::new(
                self.integrator.clone(),
                Arc::new(self.failed_tools.clone()),
                Arc::new(self.workflows.clone()),
                Arc::new(self.workflow_runs.clone()),
                Arc::new(FixedClock::new(now())),
            )
        }
    }

    #[tokio::test]
    async fn test_起動成功で3テーブルに反映する() {
        // Given
        let fixture = Fixture::new(StubIntegrator::new(200, json!({"workflow_id": "wf-new"})));

        // When
        let output = fixture.sut().execute(input()).await.unwrap();

        // Then
        assert_eq!(output.workflow_id.as_str(), "wf-new");
        assert_eq!(output.api_response, json!({"workflow_id": "wf-new"}));
        assert!(output.patch_outcomes.iter().all(PatchOutcome::is_success));

        let mut patched: Vec<_> = fixture
            .failed_tools
            .patches()
            .into_iter()
            .map(|(key, patch)| {
                assert_eq!(
                    patch,
                    FailedToolRetryPatch::new(WorkflowId::new("wf-new").unwrap(), now()).unwrap()
                );
                (key.toolkit, key.action_name)
            })
            .collect();
        patched.sort();
        assert_eq!(
            patched,
            vec![
                ("github".to_string(), "GITHUB_A".to_string()),
                ("github".to_string(), "GITHUB_B".to_string()),
            ]
        );

        let workflows = fixture.workflows.workflows();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].linear_ticket, "ENG-5");
        assert_eq!(workflows[0].environment.as_str(), "production");

        assert_eq!(
            fixture.workflow_runs.inserted(),
            vec![
                NewWorkflowRun::pending(WorkflowId::new("wf-new").unwrap(), RunNumber::first(), now())
                    .with_total(2)
            ]
        );
    }

    #[tokio::test]
    async fn test_ペイロードは指定アクションと正規化済み環境を含む() {
        let fixture = Fixture::new(StubIntegrator::new(200, json!({"workflow_id": "wf-new"})));

        fixture.sut().execute(input()).await.unwrap();

        let payloads = fixture.integrator.payloads.lock().unwrap().clone();
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads[0].action_names,
            Some(vec![json!("GITHUB_A"), json!("GITHUB_B")])
        );
        assert_eq!(payloads[0].env.as_str(), "production");
        assert_eq!(
            payloads[0].linear_issue_link,
            "https://linear.app/composio/issue/ENG-5"
        );
    }

    #[tokio::test]
    async fn test_workflow_idなしは起動失敗でストアに書き込まない() {
        let fixture = Fixture::new(StubIntegrator::new(200, json!({"message": "quota exceeded"})));

        let result = fixture.sut().execute(input()).await;

        let Err(RetryError::Trigger(failure)) = result else {
            panic!("Trigger エラーを期待した");
        };
        assert_eq!(failure.details, "quota exceeded");
        assert!(fixture.failed_tools.patches().is_empty());
        assert!(fixture.workflows.workflows().is_empty());
        assert!(fixture.workflow_runs.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_ストア書き込みの失敗は成功レスポンスを妨げない() {
        let integrator = Arc::new(StubIntegrator::new(200, json!({"workflow_id": "wf-new"})));
        let sut = RetryActionsUseCaseImpl::new(
            integrator,
            Arc::new(MockFailedToolRepository::failing()),
            Arc::new(MockWorkflowRepository::failing()),
            Arc::new(MockWorkflowRunRepository::failing()),
            Arc::new(FixedClock::new(now())),
        );

        let output = sut.execute(input()).await.unwrap();

        assert_eq!(output.workflow_id.as_str(), "wf-new");
        assert_eq!(output.patch_outcomes.len(), 2);
        assert!(output.patch_outcomes.iter().all(|o| !o.is_success()));
    }
}
