//! # 外部 API クライアント
//!
//! BFF から上流のワークフロー自動化 API（Integrator）への通信を担当する。

pub mod integrator;
pub mod trigger_payload;

pub use integrator::{
    DashboardData,
    DashboardDataOutcome,
    DashboardDataRequest,
    IntegratorClient,
    IntegratorClientImpl,
    IntegratorError,
    TriggerFailure,
    TriggerResponse,
};
pub use trigger_payload::TriggerPayload;
