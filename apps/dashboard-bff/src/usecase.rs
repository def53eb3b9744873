//! # ユースケース
//!
//! リトライ系ハンドラのビジネスロジック。
//!
//! どちらのユースケースも「上流でワークフローを起動 → 起動結果をストアに反映」
//! の 2 段階で、ストアへの反映は起動成功後のベストエフォートとする。

mod retry_actions;
mod retry_run;

use thiserror::Error;
use toolretry_domain::DomainError;
use toolretry_infra::InfraError;

pub use retry_actions::{PatchOutcome, RetryActionsInput, RetryActionsOutput, RetryActionsUseCaseImpl};
pub use retry_run::{RetryRunInput, RetryRunOutput, RetryRunUseCaseImpl};

use crate::client::{IntegratorError, TriggerFailure};

/// リトライ系ユースケースのエラー
#[derive(Debug, Error)]
pub enum RetryError {
    /// 上流が起動を受け付けなかった（2xx 以外、または workflow_id なし）
    #[error("ワークフローの起動に失敗しました: {}", .0.details)]
    Trigger(TriggerFailure),

    /// 上流との通信・レスポンス解析に失敗
    #[error(transparent)]
    Integrator(#[from] IntegratorError),

    /// 起動後に必須のストア読み取りに失敗
    #[error(transparent)]
    Store(#[from] InfraError),

    /// 書き込む状態がドメインルールに反する
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<TriggerFailure> for RetryError {
    fn from(failure: TriggerFailure) -> Self {
        Self::Trigger(failure)
    }
}
