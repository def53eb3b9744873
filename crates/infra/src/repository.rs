//! # リポジトリ
//!
//! バッキングストアの 3 テーブルに対する読み書きを提供する。
//!
//! ## 設計方針
//!
//! - テーブルごとにトレイトを定義し、ユースケース層はトレイトオブジェクト経由で利用する
//! - 実装は [`RestStoreClient`](crate::rest_store::RestStoreClient) を使う REST 実装のみ
//! - テスト用のインメモリ実装は [`mock`](crate::mock)（`test-utils` feature）に置く

pub mod failed_tool_repository;
pub mod workflow_repository;
pub mod workflow_run_repository;

pub use failed_tool_repository::{FailedToolRepository, RestFailedToolRepository};
pub use workflow_repository::{RestWorkflowRepository, WorkflowRepository};
pub use workflow_run_repository::{RestWorkflowRunRepository, WorkflowRunRepository};
