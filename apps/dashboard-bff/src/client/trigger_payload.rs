//! # ワークフロー起動ペイロード
//!
//! `POST /workflows/test-and-fix-action/run` に送るリクエストボディ。
//!
//! エージェント設定（モデル・ブランチ・タイムアウト・指示文）は固定値で、
//! 呼び出し側が指定するのはツールキット・接続・環境・対象アクションのみ。

use serde::Serialize;
use serde_json::Value;
use toolretry_domain::value_objects::{Environment, LinearTicket, WorkflowId};

/// 固定のエージェント設定
pub mod defaults {
    pub const MODEL_PROVIDER: &str = "claude";
    pub const FORCE_RUN: bool = true;
    pub const TIMEOUT_HOURS: u32 = 36;
    pub const INTEGRATOR_BRANCH: &str = "next";
    pub const BASE_BRANCH: &str = "master";
    pub const TEST_INSTRUCTION: &str = "Test thoroughly and ensure: (1) tool/parameter descriptions are clear and accurate, not sloppy or vague, (2) correct API endpoints are used, (3) response schemas are complete and useful, (4) the tool is well-built for agent use with sensible defaults.";
}

/// ワークフロー起動ペイロード
///
/// `action_names` を省略すると全アクションが対象になる。
/// 要素は呼び出し側から受け取った JSON 値をそのまま送る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerPayload {
    pub model_provider:       &'static str,
    pub force_run:            bool,
    pub timeout_hours:        u32,
    pub linear_issue_link:    String,
    pub env:                  Environment,
    pub integrator_branch:    &'static str,
    pub app_name:             String,
    pub base_branch:          &'static str,
    pub connection_id:        String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_workflow_id: Option<WorkflowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_names:         Option<Vec<Value>>,
    pub test_instruction:     &'static str,
}

impl TriggerPayload {
    pub fn new(
        app_name: impl Into<String>,
        connection_id: impl Into<String>,
        env: Environment,
        linear_ticket: Option<&LinearTicket>,
    ) -> Self {
        Self {
            model_provider: defaults::MODEL_PROVIDER,
            force_run: defaults::FORCE_RUN,
            timeout_hours: defaults::TIMEOUT_HOURS,
            linear_issue_link: LinearTicket::issue_link(linear_ticket),
            env,
            integrator_branch: defaults::INTEGRATOR_BRANCH,
            app_name: app_name.into(),
            base_branch: defaults::BASE_BRANCH,
            connection_id: connection_id.into(),
            previous_workflow_id: None,
            action_names: None,
            test_instruction: defaults::TEST_INSTRUCTION,
        }
    }

    /// 対象アクションを限定する
    pub fn with_action_names<I, T>(mut self, action_names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.action_names = Some(action_names.into_iter().map(Into::into).collect());
        self
    }

    /// 再実行元のワークフローを指定する
    pub fn with_previous_workflow_id(mut self, workflow_id: WorkflowId) -> Self {
        self.previous_workflow_id = Some(workflow_id);
        self
    }
}
