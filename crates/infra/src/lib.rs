//! # ToolRetry インフラ層
//!
//! バッキングストア（PostgREST 形式の REST インターフェース）との通信を担当する。
//!
//! ## 設計方針
//!
//! このクレートはリポジトリトレイトとその REST 実装を提供する。
//! ストアの URL 形式や認証ヘッダーなどの詳細をカプセル化し、
//! ユースケース層からはトレイト経由でのみ利用する。
//!
//! ## 依存関係
//!
//! ```text
//! dashboard-bff → infra → domain
//!       ↓
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`rest_store`] - REST クライアント（認証・URL 組み立て・ステータス検査）
//! - [`repository`] - リポジトリトレイトと REST 実装
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use toolretry_infra::{RestStoreClient, repository::RestWorkflowRunRepository};
//!
//! let store = RestStoreClient::new("https://xyz.supabase.co", service_key);
//! let runs = RestWorkflowRunRepository::new(store.clone());
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;
pub mod rest_store;

pub use error::{InfraError, InfraErrorKind};
pub use rest_store::RestStoreClient;
