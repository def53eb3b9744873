//! # ワークフロー（workflows）
//!
//! 上流 API が新しい workflow_id を採番するたびに upsert される行。

use serde::Serialize;

use crate::value_objects::{Environment, LinearTicket, WorkflowId};

/// ワークフロー行
///
/// `workflow_id` で一意。既存行がある場合はマージ（upsert）される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workflow {
    pub workflow_id:   WorkflowId,
    pub app_name:      String,
    pub linear_ticket: String,
    pub connection_id: String,
    pub environment:   Environment,
}

impl Workflow {
    /// ワークフロー行を作成する
    ///
    /// チケット未指定時は `linear_ticket` に `"N/A"` を保存する。
    pub fn new(
        workflow_id: WorkflowId,
        app_name: impl Into<String>,
        linear_ticket: Option<&LinearTicket>,
        connection_id: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            workflow_id,
            app_name: app_name.into(),
            linear_ticket: LinearTicket::column_value(linear_ticket),
            connection_id: connection_id.into(),
            environment,
        }
    }
}
