//! # ToolRetry ドメイン層
//!
//! ダッシュボードが追跡する 3 つのテーブル行と、その値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - 行は外部ストアが所有し、本システムはキャッシュしない
//! - 書き込み差分（パッチ・新規行）を型として表現し、シリアライズ形状を固定する
//! - 暗黙だった状態遷移（failed → retrying / active・PENDING）を列挙型で明示する
//!
//! ## 依存関係の方向
//!
//! ```text
//! dashboard-bff → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`value_objects`] - WorkflowId / RunNumber / Environment / LinearTicket
//! - [`failed_tool`] - 失敗ツール行とリトライ差分
//! - [`workflow`] - ワークフロー行
//! - [`workflow_run`] - ワークフロー実行行
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー

pub mod clock;
pub mod error;
pub mod failed_tool;
pub mod value_objects;
pub mod workflow;
pub mod workflow_run;

pub use error::DomainError;
